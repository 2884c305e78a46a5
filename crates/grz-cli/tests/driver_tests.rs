use super::*;
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(json: &str) -> Fixture {
    Fixture::from_json(json).unwrap()
}

fn outputs(report: &Report) -> Vec<&str> {
    report.entries.iter().map(|entry| entry.output.as_str()).collect()
}

fn command(name: &str) -> Command {
    let fixture = PathBuf::from("fixture.json");
    match name {
        "render" => Command::Render {
            fixture,
            presentable: false,
        },
        "lub" => Command::Lub { fixture },
        "params" => Command::Params { fixture },
        _ => Command::Assignable { fixture },
    }
}

#[test]
fn test_render() {
    let types = fixture(r#"{"types": ["List<String>", "[int, String]", "['a':int]"]}"#);
    let report = run_fixture(&command("render"), &types, &SolverConfig::default()).unwrap();
    assert_eq!(report.command, "render");
    assert_eq!(
        outputs(&report),
        ["java.util.List<java.lang.String>", "[int, java.lang.String]", "['a':int]"]
    );
    assert_eq!(report.entries[0].input, "List<String>");

    let presentable = Command::Render {
        fixture: PathBuf::from("fixture.json"),
        presentable: true,
    };
    let report = run_fixture(&presentable, &types, &SolverConfig::default()).unwrap();
    assert_eq!(report.entries[0].output, "List<String>");
}

#[test]
fn test_render_respects_config() {
    let types = fixture(r#"{"types": ["java.util.List<java.util.List<String>>"]}"#);
    let config = SolverConfig {
        max_render_depth: 1,
        ..SolverConfig::default()
    };
    let report = run_fixture(&command("render"), &types, &config).unwrap();
    assert_eq!(outputs(&report), ["java.util.List<List>"]);
}

#[test]
fn test_lub() {
    let animals = fixture(
        r#"{
          "classes": [
            { "name": "p.Animal" },
            { "name": "p.Dog", "supertypes": ["p.Animal"] },
            { "name": "p.Cat", "supertypes": ["p.Animal"] }
          ],
          "types": ["p.Dog", "p.Cat"]
        }"#,
    );
    let report = run_fixture(&command("lub"), &animals, &SolverConfig::default()).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].input, "p.Dog | p.Cat");
    assert_eq!(report.entries[0].output, "p.Animal");

    let numbers = fixture(r#"{"types": ["int", "long"]}"#);
    let report = run_fixture(&command("lub"), &numbers, &SolverConfig::default()).unwrap();
    assert_eq!(outputs(&report), ["java.lang.Long"]);
}

#[test]
fn test_params() {
    let types = fixture(
        r#"{"types": ["java.util.Map<String, Integer>", "[int..long]", "[int, long]", "[:]", "java.lang.String"]}"#,
    );
    let report = run_fixture(&command("params"), &types, &SolverConfig::default()).unwrap();
    assert_eq!(
        outputs(&report),
        [
            "[java.lang.String, java.lang.Integer]",
            "[java.lang.Long]",
            "[java.lang.Long]",
            "[?, ?]",
            "[]",
        ]
    );
}

#[test]
fn test_assignable() {
    let types = fixture(
        r#"{"types": ["java.util.List<String>", "java.util.ArrayList<String>", "java.lang.String", "java.util.ArrayList<Integer>"]}"#,
    );
    let report = run_fixture(&command("assignable"), &types, &SolverConfig::default()).unwrap();
    assert_eq!(outputs(&report), ["true", "false", "false"]);
    assert_eq!(
        report.entries[0].input,
        "java.util.List<String> <- java.util.ArrayList<String>"
    );
}

#[test]
fn test_report_rendering() {
    let report = Report {
        command: "lub",
        entries: vec![ReportEntry::new("int | long", "java.lang.Long")],
    };
    assert_eq!(report.render(OutputFormat::Text).unwrap(), "int | long: java.lang.Long\n");

    let json: serde_json::Value =
        serde_json::from_str(&report.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(json["command"], "lub");
    assert_eq!(json["entries"][0]["output"], "java.lang.Long");
}

#[test]
fn test_run_reads_fixture_and_config() {
    let dir = TempDir::new().unwrap();
    let fixture_path = dir.path().join("types.json");
    let config_path = dir.path().join("grz.json");
    std::fs::write(&fixture_path, r#"{"types": ["java.util.List<java.util.List<int>>"]}"#).unwrap();
    std::fs::write(&config_path, r#"{"maxRenderDepth": 1}"#).unwrap();

    let fixture_arg = fixture_path.to_str().unwrap();
    let config_arg = config_path.to_str().unwrap();

    let args = CliArgs::try_parse_from(["grz", "--config", config_arg, "render", fixture_arg]).unwrap();
    let report = run(&args).unwrap();
    assert_eq!(outputs(&report), ["java.util.List<List>"]);

    let defaults = CliArgs::try_parse_from(["grz", "render", fixture_arg]).unwrap();
    let report = run(&defaults).unwrap();
    assert_eq!(outputs(&report), ["java.util.List<java.util.List<int>>"]);
}

#[test]
fn test_config_errors() {
    assert_eq!(load_config(None).unwrap(), SolverConfig::default());

    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"maxRenderDepth": "deep"}"#).unwrap();
    let err = load_config(Some(&bad)).unwrap_err();
    assert!(err.to_string().contains("invalid config"), "{err:#}");
}
