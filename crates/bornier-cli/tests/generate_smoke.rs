use assert_cmd::Command;

const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project version="0.80" title="smoke">
  <newdiagrams>
    <report label="%f-%l%c"/>
  </newdiagrams>
  <collection>
    <category name="import">
      <element name="terminal.elmt">
        <definition height="30" width="10" link_type="terminal" type="element" version="0.4"/>
      </element>
    </category>
  </collection>
  <diagram order="1" title="main" cols="17" colsize="60" rows="8" rowsize="80" folio="%id">
    <element type="embed://import/terminal.elmt" uuid="{t-1}" x="85" y="105">
      <terminals>
        <terminal id="1" x="0" y="0" orientation="n"/>
        <terminal id="2" x="0" y="30" orientation="s"/>
      </terminals>
      <elementInformations>
        <elementInformation name="label" show="1">X1:1</elementInformation>
      </elementInformations>
    </element>
    <element type="embed://import/terminal.elmt" uuid="{t-2}" x="145" y="105">
      <terminals>
        <terminal id="3" x="0" y="0" orientation="n"/>
        <terminal id="4" x="0" y="30" orientation="s"/>
      </terminals>
      <elementInformations>
        <elementInformation name="label" show="1">X1:2</elementInformation>
      </elementInformations>
    </element>
    <conductors>
      <conductor terminal1="1" terminal2="9" num="L1"/>
    </conductors>
  </diagram>
</project>
"#;

#[test]
fn blocks_lists_block_names() {
    let mut cmd = Command::cargo_bin("bornier-cli").unwrap();
    cmd.arg("blocks")
        .write_stdin(PROJECT)
        .assert()
        .success()
        .stdout("X1\n");
}

#[test]
fn terminals_prints_the_table_as_json() {
    let mut cmd = Command::cargo_bin("bornier-cli").unwrap();
    let assert = cmd
        .args(["terminals", "--pretty", "-"])
        .write_stdin(PROJECT)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let table: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(table.as_array().unwrap().len(), 2);
    assert_eq!(table[0]["block_name"], "X1");
    assert_eq!(table[0]["cable"], "L1");
    assert_eq!(table[0]["xref"], "1-B2");
}

#[test]
fn generate_writes_the_project_with_the_block() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smoke.qet");
    std::fs::write(&path, PROJECT).unwrap();

    let mut cmd = Command::cargo_bin("bornier-cli").unwrap();
    cmd.args(["generate", path.to_str().unwrap()])
        .assert()
        .success();

    let rewritten = std::fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains("TB_X1.elmt"));
    // The diagram pages survive the rewrite.
    assert!(rewritten.contains("uuid=\"{t-1}\""));
}

#[test]
fn generate_from_stdin_requires_out() {
    let mut cmd = Command::cargo_bin("bornier-cli").unwrap();
    cmd.arg("generate").write_stdin(PROJECT).assert().code(2);
}

#[test]
fn layout_of_unknown_block_fails() {
    let mut cmd = Command::cargo_bin("bornier-cli").unwrap();
    cmd.args(["layout", "--block", "X9"])
        .write_stdin(PROJECT)
        .assert()
        .code(1);
}
