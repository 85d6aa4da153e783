mod meta;

/// A small two-page project: block X1 on page one (a grounded terminal and a
/// bridged hose terminal), block X2 on page two using the old label/formula
/// style without dynamic texts.
pub(crate) const FIXTURE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project version="0.80" title="demo">
  <newdiagrams>
    <report label="%f-%l%c"/>
  </newdiagrams>
  <collection>
    <category name="import">
      <category name="terminals">
        <element name="terminal.elmt">
          <definition height="30" width="10" link_type="terminal" type="element" version="0.4"/>
        </element>
        <element name="contactor.elmt">
          <definition height="40" width="40" link_type="simple" type="element" version="0.4"/>
        </element>
      </category>
    </category>
  </collection>
  <diagram order="1" title="power" cols="17" colsize="60" rows="8" rowsize="80" folio="%id">
    <element type="embed://import/terminals/terminal.elmt" uuid="{aaa-1}" x="145" y="105">
      <terminals>
        <terminal id="10" x="0" y="0" orientation="n"/>
        <terminal id="11" x="0" y="30" orientation="s"/>
      </terminals>
      <elementInformations>
        <elementInformation name="label" show="1">X1:2</elementInformation>
        <elementInformation name="function" show="0">%p2%tGROUND%h%n%b%</elementInformation>
      </elementInformations>
    </element>
    <element type="embed://import/terminals/terminal.elmt" uuid="{aaa-2}" x="205" y="185">
      <terminals>
        <terminal id="12" x="0" y="0" orientation="n"/>
        <terminal id="13" x="0" y="30" orientation="s"/>
      </terminals>
      <elementInformations>
        <elementInformation name="label" show="1">stale</elementInformation>
        <elementInformation name="function" show="0">%p1%tSTANDARD%hW9%n1.5%b1%</elementInformation>
      </elementInformations>
      <dynamic_texts>
        <dynamic_elmt_text text_from="ElementInfo" uuid="{ddd-1}" font_size="9">
          <text>X1:1</text>
        </dynamic_elmt_text>
      </dynamic_texts>
    </element>
    <element type="embed://import/terminals/contactor.elmt" uuid="{bbb-1}" x="300" y="300">
      <elementInformations>
        <elementInformation name="label" show="1">KM1:A</elementInformation>
      </elementInformations>
    </element>
    <conductors>
      <conductor terminal1="10" terminal2="40" num="L1"/>
      <conductor terminal1="41" terminal2="13" num="N7"/>
    </conductors>
  </diagram>
  <diagram order="2" title="control" cols="17" colsize="60" rows="8" rowsize="80" folio="%id">
    <element type="embed://import/terminals/terminal.elmt" uuid="{ccc-1}" x="25" y="25">
      <terminals>
        <terminal id="20" x="0" y="0" orientation="n"/>
        <terminal id="21" x="0" y="30" orientation="s"/>
      </terminals>
      <elementInformations>
        <elementInformation name="label" show="1"/>
        <elementInformation name="formula" show="0">X2:1</elementInformation>
      </elementInformations>
    </element>
    <conductors>
    </conductors>
  </diagram>
</project>
"#;
