use super::*;
use crate::config::ImageFormat;
use std::fs;
use tempfile::TempDir;

const LOGIN: &str = r#"@startuml
actor User
participant System
' @step {"name": "Step 1: User Login", "newPage": false}
User -> System: Login Request
' @step {"name": "Step 2: Dashboard", "newPage": true}
User -> System: View Dashboard
@enduml
"#;

fn no_render() -> RenderArgs {
    RenderArgs {
        no_render: true,
        ..RenderArgs::default()
    }
}

fn write(root: &Path, rel: &str, text: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, text).expect("write file");
    path
}

#[test]
fn parse_summary_lists_counts_and_documents() {
    let steps = steps::parse_lines(LOGIN.lines().map(|line| Ok(line.to_string())))
        .expect("parse");
    let summary = parse_summary(&steps);
    assert!(summary.starts_with("Found 2 steps in file\n"));
    assert!(summary.contains("\nStep 2: Step 2: Dashboard\nNew Page: true\n"));
    assert!(summary.contains("Declarations: 2\nContent Lines: 1\n"));
    assert!(summary.contains("@startuml\n\nactor User\nparticipant System\n"));
    assert_eq!(summary.matches(SEPARATOR).count(), 2);
}

#[test]
fn generate_writes_step_sources_and_viewer() {
    let src = TempDir::new().expect("src");
    let out = TempDir::new().expect("out");
    let file = write(src.path(), "login.puml", LOGIN);

    run_generate(GenerateArgs {
        file,
        out: out.path().to_path_buf(),
        render: no_render(),
    })
    .expect("generate");

    assert!(out.path().join("step-01-step-1-user-login.puml").is_file());
    assert!(out.path().join("step-02-step-2-dashboard.puml").is_file());
    assert!(out.path().join("summary.puml").is_file());
    assert!(out.path().join("index.html").is_file());
    assert!(out.path().join("steps.json").is_file());
}

#[test]
fn process_builds_deck_and_index_for_every_source() {
    let src = TempDir::new().expect("src");
    write(src.path(), "login.puml", LOGIN);
    write(
        src.path(),
        "flows/checkout.puml",
        "' @step {\"name\": \"Pay\"}\nUser -> Shop: pay\n",
    );
    write(src.path(), "style.puml", "@startuml\nskinparam monochrome true\n@enduml\n");
    let out = src.path().join("out");

    run_process(ProcessArgs {
        source_dir: src.path().to_path_buf(),
        out: out.clone(),
        render: RenderArgs {
            style: Some(src.path().join("style.puml")),
            no_summary: true,
            ..no_render()
        },
    })
    .expect("process");

    assert!(out.join("login/step-01-step-1-user-login.puml").is_file());
    assert!(out.join("flows/checkout/step-01-pay.puml").is_file());
    assert!(!out.join("login/summary.puml").exists());
    assert!(!out.join("style").exists());

    let styled = fs::read_to_string(out.join("flows/checkout/step-01-pay.puml"))
        .expect("read step");
    assert!(styled.starts_with("@startuml\nskinparam monochrome true\ntitle Pay\n"));

    let deck = fs::read_to_string(out.join("deck.html")).expect("read deck");
    assert_eq!(deck.matches("class=\"slide\"").count(), 2);
    let index = fs::read_to_string(out.join("index.html")).expect("read index");
    assert!(index.contains("href=\"flows/checkout/index.html\""));
    assert!(index.contains("href=\"login/index.html\""));
}

#[test]
fn process_rejects_empty_source_tree() {
    let src = TempDir::new().expect("src");
    let err = run_process(ProcessArgs {
        source_dir: src.path().to_path_buf(),
        out: src.path().join("out"),
        render: no_render(),
    })
    .expect_err("no sources");
    assert!(err.to_string().contains("no .puml sources"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().expect("dir");
    let args = || InitArgs {
        dir: dir.path().to_path_buf(),
        force: false,
        print: false,
    };
    run_init(args()).expect("first init");
    let written = config::load_config(&dir.path().join(config::CONFIG_FILE_NAME))
        .expect("load written config");
    assert_eq!(written, config::default_config());

    let err = run_init(args()).expect_err("second init");
    assert!(err.to_string().contains("--force"));
    run_init(InitArgs {
        dir: dir.path().to_path_buf(),
        force: true,
        print: false,
    })
    .expect("forced init");
}

#[test]
fn cli_flags_override_config_file() {
    let dir = TempDir::new().expect("dir");
    write(
        dir.path(),
        config::CONFIG_FILE_NAME,
        r#"{"schema_version": 1, "image_format": "svg", "style": "theme.puml"}"#,
    );

    let from_file = resolve_config(&RenderArgs::default(), dir.path()).expect("config");
    assert_eq!(from_file.style, Some(dir.path().join("theme.puml")));
    assert_eq!(from_file.image_format, ImageFormat::Svg);

    let overridden = resolve_config(
        &RenderArgs {
            format: Some(ImageFormat::Png),
            no_summary: true,
            ..RenderArgs::default()
        },
        dir.path(),
    )
    .expect("config");
    assert_eq!(overridden.image_format, ImageFormat::Png);
    assert!(!overridden.summary);
}

#[test]
fn parent_dir_defaults_to_current_directory() {
    assert_eq!(parent_dir(Path::new("login.puml")), PathBuf::from("."));
    assert_eq!(parent_dir(Path::new("flows/login.puml")), PathBuf::from("flows"));
}
