//! Typed SQL fragments: identifier/literal quoting and placeholder templates.
//!
//! Nothing in this crate splices an externally derived string into SQL text
//! without going through [`ident`] or [`literal`]. Column names come from the
//! export's sheet headers and file paths come from the command line, so both
//! are treated as untrusted.

use crate::error::SynthesisError;

/// Placeholder standing in for a field the export does not carry.
pub const NULL_TEXT: &str = "NULL::VARCHAR";

/// Placeholder for a list-valued field the export does not carry.
pub const NULL_TEXT_LIST: &str = "NULL::VARCHAR[]";

/// Quote an identifier: `Capacity MiB` -> `"Capacity MiB"`, doubling embedded quotes.
#[must_use]
pub fn ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Qualified identifier: `qualified("d", "Free MiB")` -> `d."Free MiB"`.
#[must_use]
pub fn qualified(qualifier: &str, name: &str) -> String {
    format!("{qualifier}.{}", ident(name))
}

/// Quote a string literal: `O'Brien` -> `'O''Brien'`.
#[must_use]
pub fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// A named query template with `{{placeholder}}` slots.
///
/// Templates are plain data; a template set is handed to the query builder at
/// construction and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub name: &'static str,
    pub text: &'static str,
}

impl Template {
    #[must_use]
    pub const fn new(name: &'static str, text: &'static str) -> Self {
        Self { name, text }
    }

    /// Substitute every placeholder and return the trimmed query text.
    ///
    /// Every placeholder must be bound and every parameter must be used, so a
    /// template and the code feeding it cannot silently drift apart.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] for unbound placeholders, unused parameters,
    /// or an unterminated `{{`.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String, SynthesisError> {
        let mut out = String::with_capacity(self.text.len() + 256);
        let mut used = vec![false; params.len()];
        let mut rest = self.text;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                return Err(SynthesisError::Malformed {
                    template: self.name,
                    offset: offset + start,
                });
            };
            let key = after_open[..end].trim();
            let Some(idx) = params.iter().position(|(name, _)| *name == key) else {
                return Err(SynthesisError::UnboundPlaceholder {
                    template: self.name,
                    placeholder: key.to_string(),
                });
            };
            used[idx] = true;
            out.push_str(params[idx].1);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        out.push_str(rest);

        if let Some(idx) = used.iter().position(|u| !u) {
            return Err(SynthesisError::UnusedParameter {
                template: self.name,
                parameter: params[idx].0.to_string(),
            });
        }

        Ok(out.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ident_doubles_embedded_quotes() {
        assert_eq!(ident("Network #1"), "\"Network #1\"");
        assert_eq!(ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn literal_doubles_single_quotes() {
        assert_eq!(literal("/tmp/o'brien.xlsx"), "'/tmp/o''brien.xlsx'");
    }

    #[test]
    fn qualified_prefixes_alias() {
        assert_eq!(qualified("d", "Free MiB"), "d.\"Free MiB\"");
    }

    #[test]
    fn render_substitutes_repeated_placeholders() {
        let t = Template::new("t", "SELECT {{a}}, {{ a }} FROM {{b}}");
        let sql = t.render(&[("a", "x"), ("b", "tbl")]).unwrap();
        assert_eq!(sql, "SELECT x, x FROM tbl");
    }

    #[test]
    fn render_rejects_unbound_placeholder() {
        let t = Template::new("t", "SELECT {{missing}}");
        let err = t.render(&[]).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::UnboundPlaceholder {
                template: "t",
                placeholder: "missing".into()
            }
        );
    }

    #[test]
    fn render_rejects_unused_parameter() {
        let t = Template::new("t", "SELECT 1");
        let err = t.render(&[("extra", "x")]).unwrap_err();
        assert!(matches!(err, SynthesisError::UnusedParameter { .. }));
    }

    #[test]
    fn render_rejects_unterminated_placeholder() {
        let t = Template::new("t", "SELECT 1, {{oops");
        let err = t.render(&[]).unwrap_err();
        assert_eq!(
            err,
            SynthesisError::Malformed {
                template: "t",
                offset: 10
            }
        );
    }

    #[test]
    fn render_trims_surrounding_whitespace() {
        let t = Template::new("t", "\n   SELECT 1\n");
        assert_eq!(t.render(&[]).unwrap(), "SELECT 1");
    }
}
