use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use std::error::Error;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

const PERSON: &str = r#"{
    "title": "Person",
    "type": "object",
    "properties": {
        "name": {"type": "string"},
        "friend": {"type": "object", "properties": {"name": {"type": "string"}}}
    },
    "required": ["name"]
}"#;

const CONFIG: &str = r#"{"prefix": "ex", "uri": "https://example.org/ns#"}"#;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("jscld")?)
}

fn workspace() -> Result<TempDir> {
    let temp = TempDir::new()?;
    temp.child("schemas").create_dir_all()?;
    temp.child("schemas/person.json").write_str(PERSON)?;
    temp.child("jscld.config.json").write_str(CONFIG)?;
    Ok(temp)
}

#[test]
fn cli_without_arguments_prints_usage() -> Result<()> {
    cli_command()?
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: jscld"))
        .stdout(predicate::str::contains("--source"));
    Ok(())
}

#[test]
fn cli_with_only_source_prints_usage() -> Result<()> {
    cli_command()?
        .arg("--source")
        .arg("schemas")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"));
    Ok(())
}

#[test]
fn cli_version() -> Result<()> {
    cli_command()?
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("jscld "));
    Ok(())
}

#[test]
fn cli_converts_a_directory() -> Result<()> {
    let temp = workspace()?;
    let out = temp.child("out");
    cli_command()?
        .arg("--source")
        .arg(temp.child("schemas").path())
        .arg("--config")
        .arg(temp.child("jscld.config.json").path())
        .arg("--out")
        .arg(out.path())
        .assert()
        .success();

    out.child("person.ttl")
        .assert(predicate::str::contains("@prefix ex: <https://example.org/ns#>"));
    out.child("person.ttl")
        .assert(predicate::str::contains("ex:Person_friend"));
    out.child("person_shacl.ttl")
        .assert(predicate::str::contains("sh:NodeShape"));
    Ok(())
}

#[test]
fn cli_format_flag_overrides_config() -> Result<()> {
    let temp = workspace()?;
    temp.child("jscld.config.json").write_str(
        r#"{"prefix": "ex", "uri": "https://example.org/ns#", "out": "ignored", "format": "rdf/xml"}"#,
    )?;
    let out = temp.child("nt");
    cli_command()?
        .arg("-s")
        .arg(temp.child("schemas/person.json").path())
        .arg("-c")
        .arg(temp.child("jscld.config.json").path())
        .arg("-o")
        .arg(out.path())
        .arg("-f")
        .arg("n-triples")
        .assert()
        .success();

    out.child("person.nt").assert(predicate::str::contains(
        "<https://example.org/ns#Person> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2000/01/rdf-schema#Class> .",
    ));
    out.child("person_shacl.nt").assert(predicate::path::exists());
    temp.child("ignored").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn cli_missing_config_file_fails() -> Result<()> {
    let temp = workspace()?;
    cli_command()?
        .arg("--source")
        .arg(temp.child("schemas").path())
        .arg("--config")
        .arg(temp.child("missing.json").path())
        .arg("--out")
        .arg(temp.child("out").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("can not locate configuration file"));
    temp.child("out").assert(predicate::path::missing());
    Ok(())
}

#[test]
fn cli_invalid_prefix_fails() -> Result<()> {
    let temp = workspace()?;
    temp.child("jscld.config.json")
        .write_str(r#"{"prefix": "not a prefix", "uri": "https://example.org/ns#"}"#)?;
    cli_command()?
        .arg("--source")
        .arg(temp.child("schemas").path())
        .arg("--config")
        .arg(temp.child("jscld.config.json").path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid namespace prefix"));
    Ok(())
}

#[test]
fn cli_bad_file_does_not_stop_the_batch() -> Result<()> {
    let temp = workspace()?;
    temp.child("schemas/broken.json").write_str(
        r#"{"type": "object", "properties": {"friend": {"type": "object", "properties": {"x": {}}}}}"#,
    )?;
    let out = temp.child("out");
    cli_command()?
        .arg("--source")
        .arg(temp.child("schemas").path())
        .arg("--config")
        .arg(temp.child("jscld.config.json").path())
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.friend.x"));

    out.child("person.ttl").assert(predicate::path::exists());
    out.child("broken.ttl").assert(predicate::path::missing());
    Ok(())
}
