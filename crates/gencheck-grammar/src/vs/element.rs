//! Elements written one attribute per line, as both project-file
//! generations do:
//!
//! ```text
//! \t\t<Tool
//! \t\t\tName="VCCLCompilerTool"
//! \t\t\tOptimization="0"/>
//! ```
//!
//! The closing `>` or `/>` either trails the last attribute or sits on its
//! own line at the element's indentation.

use gencheck_cursor::{Cursor, GrammarError, Result};
use regex::escape;

/// How attribute names are joined to their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttrStyle {
    /// `Name="value"` (`.vcproj`).
    Tight,
    /// `Name = "value"` (`.csproj` before MSBuild).
    Spaced,
}

impl AttrStyle {
    fn separator(self) -> &'static str {
        match self {
            AttrStyle::Tight => "=",
            AttrStyle::Spaced => " = ",
        }
    }
}

#[derive(Debug, Clone)]
struct Attribute {
    name: String,
    value: String,
    line: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    tag: String,
    line: usize,
    style: AttrStyle,
    attrs: Vec<Attribute>,
}

impl Element {
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.attribute(name).map(|a| a.value.as_str())
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// The value of an attribute that must be present.
    pub(crate) fn value(&self, cursor: &Cursor<'_>, name: &str) -> Result<&str> {
        match self.attribute(name) {
            Some(attr) => Ok(&attr.value),
            None => Err(self.mismatch_at(cursor, self.line, format!("{name} attribute on <{}>", self.tag))),
        }
    }

    /// Require an attribute to be present with exactly `value`.
    pub(crate) fn require(&self, cursor: &Cursor<'_>, name: &str, value: &str) -> Result<()> {
        let expected = format!("{name}{}\"{value}\"", self.style.separator());
        match self.attribute(name) {
            Some(attr) if attr.value == value => Ok(()),
            Some(attr) => Err(self.mismatch_at(cursor, attr.line, expected)),
            None => Err(self.mismatch_at(cursor, self.line, expected)),
        }
    }

    fn mismatch_at(&self, cursor: &Cursor<'_>, line: usize, expected: String) -> GrammarError {
        let artifact = cursor.artifact();
        GrammarError::GrammarMismatch {
            path: artifact.path().to_path_buf(),
            line,
            expected,
            actual: artifact.line(line - 1).unwrap_or_default().to_string(),
        }
    }

    pub(crate) fn is(&self, name: &str, value: &str) -> bool {
        self.get(name) == Some(value)
    }

    pub(crate) fn is_true(&self, name: &str) -> bool {
        self.get(name).is_some_and(crate::tokens::is_true)
    }

    pub(crate) fn is_false(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|v| v.eq_ignore_ascii_case("false"))
    }

    /// `;`-separated list attribute; missing reads as empty.
    pub(crate) fn list(&self, name: &str) -> Vec<String> {
        self.get(name)
            .map(|v| crate::tokens::split_list(v, ';'))
            .unwrap_or_default()
    }
}

/// Read `<tag` at `indent` and its attribute lines.
pub(crate) fn read(cursor: &mut Cursor<'_>, indent: &str, tag: &str, style: AttrStyle) -> Result<Element> {
    cursor.expect(&format!("{indent}<{tag}"))?;
    read_attributes(cursor, indent, tag, style)
}

/// Read `<tag` only if it is the current line.
pub(crate) fn accept(
    cursor: &mut Cursor<'_>,
    indent: &str,
    tag: &str,
    style: AttrStyle,
) -> Result<Option<Element>> {
    if !cursor.accept(&format!("{indent}<{tag}")) {
        return Ok(None);
    }
    read_attributes(cursor, indent, tag, style).map(Some)
}

fn read_attributes(cursor: &mut Cursor<'_>, indent: &str, tag: &str, style: AttrStyle) -> Result<Element> {
    let indent = escape(indent);
    let attribute = format!(
        r#"{indent}\t(\w+){}"([^"]*)"(/>|>)?"#,
        escape(style.separator())
    );
    let close = format!("{indent}(/>|>)");

    let mut element = Element {
        tag: tag.to_string(),
        line: cursor.consumed_line(),
        style,
        attrs: Vec::new(),
    };
    loop {
        let line = cursor.position() + 1;
        let Some(mut caps) = cursor.accept_pattern(&attribute)? else {
            break;
        };
        let end = caps.pop().unwrap_or_default();
        let value = caps.pop().unwrap_or_default();
        let name = caps.pop().unwrap_or_default();
        element.attrs.push(Attribute { name, value, line });
        if !end.is_empty() {
            return Ok(element);
        }
    }

    cursor.expect_pattern(&close)?;
    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gencheck_cursor::Artifact;

    #[test]
    fn test_trailing_close() {
        let a = Artifact::from_text(
            "x.vcproj",
            "\t\t\t<Tool\n\t\t\t\tName=\"VCCLCompilerTool\"\n\t\t\t\tOptimization=\"2\"/>\nnext\n",
        );
        let mut cursor = a.cursor();
        let tool = read(&mut cursor, "\t\t\t", "Tool", AttrStyle::Tight).unwrap();
        assert!(tool.is("Name", "VCCLCompilerTool"));
        assert_eq!(tool.get("Optimization"), Some("2"));
        cursor.expect("next").unwrap();
    }

    #[test]
    fn test_close_on_own_line() {
        let a = Artifact::from_text(
            "x.csproj",
            "\t<CSHARP\n\t\tProjectType = \"Local\"\n\t\tProjectGuid = \"{A}\"\n\t>\n",
        );
        let mut cursor = a.cursor();
        let csharp = read(&mut cursor, "\t", "CSHARP", AttrStyle::Spaced).unwrap();
        assert!(csharp.is("ProjectType", "Local"));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_list_attribute() {
        let a = Artifact::from_text(
            "x.vcproj",
            "<Tool\n\tPreprocessorDefinitions=\"WIN32;_DEBUG\"\n/>\n",
        );
        let mut cursor = a.cursor();
        let tool = read(&mut cursor, "", "Tool", AttrStyle::Tight).unwrap();
        assert_eq!(tool.list("PreprocessorDefinitions"), ["WIN32", "_DEBUG"]);
        assert!(tool.list("AdditionalIncludeDirectories").is_empty());
    }

    #[test]
    fn test_require_points_at_attribute_line() {
        let a = Artifact::from_text(
            "x.vcproj",
            "<VisualStudioProject\n\tProjectType=\"Visual C++\"\n\tVersion=\"7.10\">\n",
        );
        let mut cursor = a.cursor();
        let header = read(&mut cursor, "", "VisualStudioProject", AttrStyle::Tight).unwrap();
        header.require(&cursor, "ProjectType", "Visual C++").unwrap();
        match header.require(&cursor, "Version", "7.00").unwrap_err() {
            GrammarError::GrammarMismatch { line, expected, actual, .. } => {
                assert_eq!(line, 3);
                assert_eq!(expected, "Version=\"7.00\"");
                assert_eq!(actual, "\tVersion=\"7.10\">");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(header.value(&cursor, "Name").is_err());
    }

    #[test]
    fn test_unterminated_element() {
        let a = Artifact::from_text("x.vcproj", "<Tool\n\tName=\"A\"\n");
        let mut cursor = a.cursor();
        assert!(read(&mut cursor, "", "Tool", AttrStyle::Tight).is_err());
    }

    #[test]
    fn test_accept_leaves_other_lines() {
        let a = Artifact::from_text("x.csproj", "\t\t\t</References>\n");
        let mut cursor = a.cursor();
        let reference = accept(&mut cursor, "\t\t\t\t", "Reference", AttrStyle::Spaced).unwrap();
        assert!(reference.is_none());
        assert_eq!(cursor.position(), 0);
    }
}
