//! Line-by-line state machine that turns an annotated source into steps.
//!
//! | state       | marker                | declaration            | content         | end of input          |
//! |-------------|-----------------------|------------------------|-----------------|-----------------------|
//! | `NoStepYet` | begin step → `InStep` | record globally        | buffer          | default step → `Done` |
//! | `InStep`    | seal, begin → `InStep`| record globally + step | append to step  | seal → `Done`         |
//! | `Done`      | error                 | error                  | error           | error                 |
//!
//! Blank lines and `@startuml`/`@enduml` framing are dropped in every live state.
use super::declaration::{is_blank, is_framing, DeclarationClassifier};
use super::marker::MarkerDetector;
use super::metadata::{self, StepMetadata};
use super::model::Step;
use anyhow::{anyhow, Result};

enum State {
    NoStepYet,
    InStep(Step),
    Done,
}

enum LineKind<'a> {
    Marker(&'a str),
    Declaration,
    Content,
    Dropped,
}

/// Parse state for a single document. Nothing here outlives one parse.
pub(crate) struct Accumulator {
    markers: MarkerDetector,
    classifier: DeclarationClassifier,
    state: State,
    sealed: Vec<Step>,
    global_declarations: Vec<String>,
    pre_marker_content: Vec<String>,
}

impl Accumulator {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            markers: MarkerDetector::new()?,
            classifier: DeclarationClassifier::new()?,
            state: State::NoStepYet,
            sealed: Vec::new(),
            global_declarations: Vec::new(),
            pre_marker_content: Vec::new(),
        })
    }

    pub(crate) fn feed(&mut self, line: &str) -> Result<()> {
        if matches!(self.state, State::Done) {
            return Err(anyhow!("step accumulator already finished"));
        }
        match self.classify(line)? {
            LineKind::Marker(payload) => {
                let metadata = metadata::decode(payload);
                self.begin_step(metadata);
            }
            LineKind::Declaration => self.add_declaration(line),
            LineKind::Content => self.add_content(line),
            LineKind::Dropped => {}
        }
        Ok(())
    }

    /// Seal the open step and hand out every step in document order.
    pub(crate) fn finish(&mut self) -> Result<Vec<Step>> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Done => Err(anyhow!("step accumulator already finished")),
            State::InStep(open) => {
                self.sealed.push(open);
                Ok(std::mem::take(&mut self.sealed))
            }
            State::NoStepYet => {
                let mut step = Step::new(StepMetadata::default_step());
                step.extend_declarations(&self.global_declarations);
                step.extend_content(&self.pre_marker_content);
                tracing::debug!(
                    declarations = step.declarations().len(),
                    content = step.content().len(),
                    "no step markers; using default step"
                );
                Ok(vec![step])
            }
        }
    }

    fn classify<'a>(&self, line: &'a str) -> Result<LineKind<'a>> {
        if self.markers.is_marker(line) {
            return Ok(LineKind::Marker(self.markers.extract_payload(line)?));
        }
        if is_framing(line) {
            return Ok(LineKind::Dropped);
        }
        if self.classifier.is_declaration(line) {
            return Ok(LineKind::Declaration);
        }
        if is_blank(line) {
            return Ok(LineKind::Dropped);
        }
        Ok(LineKind::Content)
    }

    fn begin_step(&mut self, metadata: StepMetadata) {
        if let State::InStep(open) = std::mem::replace(&mut self.state, State::NoStepYet) {
            self.sealed.push(open);
        }

        let carry_content = !metadata.new_page();
        let mut step = Step::new(metadata);
        // Every step re-declares everything seen so far, regardless of newPage.
        step.extend_declarations(&self.global_declarations);
        if carry_content {
            if let Some(previous) = self.sealed.last() {
                step.extend_content(previous.content());
            }
        }

        tracing::debug!(
            index = self.sealed.len() + 1,
            name = step.name(),
            new_page = step.new_page(),
            declarations = step.declarations().len(),
            carried = step.content().len(),
            "begin step"
        );
        self.state = State::InStep(step);
    }

    fn add_declaration(&mut self, line: &str) {
        self.global_declarations.push(line.to_string());
        if let State::InStep(step) = &mut self.state {
            step.push_declaration(line);
        }
    }

    fn add_content(&mut self, line: &str) {
        match &mut self.state {
            State::InStep(step) => step.push_content(line),
            _ => self.pre_marker_content.push(line.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "accumulator_tests.rs"]
mod tests;
