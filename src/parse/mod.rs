use std::sync::OnceLock;

use regex::Regex;

use crate::wire::StackKind;

/// Grammar for the multi-file marker convention: one optional header line of
/// the shape `FILE: <path>`, matched anywhere in the text, first match wins.
///
/// Known limitation: the search is not anchored to line 1, so a line of this
/// exact shape inside a generated file's body (e.g. in a comment) before the
/// real marker is indistinguishable from the marker itself.
fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"(?m)^FILE:[ \t]*(.+?)[ \t]*$").expect("valid marker regex"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOutput {
    pub file_path: String,
    pub code: String,
}

/// Splits raw model output into a file path and a code body.
///
/// Single-file mode performs no parsing: the whole text is the document and
/// the path is fixed. Multi-file mode honors the first marker line; without
/// one, the path is synthesized from the session position (`/server.js` for
/// the first file, `/file-{n}.js` afterwards).
pub fn split_output(raw: &str, stack: StackKind, context_len: usize) -> ParsedOutput {
    match stack {
        StackKind::Html => ParsedOutput {
            file_path: "index.html".into(),
            code: raw.to_string(),
        },
        StackKind::Mern => match marker().captures(raw) {
            Some(caps) => {
                let whole = caps.get(0).expect("match has a whole-group");
                let path = caps.get(1).expect("marker has a path group").as_str();
                let mut code = String::with_capacity(raw.len());
                code.push_str(&raw[..whole.start()]);
                code.push_str(&raw[whole.end()..]);
                ParsedOutput {
                    file_path: path.to_string(),
                    code: code.trim().to_string(),
                }
            }
            None => ParsedOutput {
                file_path: default_path(context_len),
                code: raw.to_string(),
            },
        },
    }
}

fn default_path(context_len: usize) -> String {
    if context_len == 0 {
        "/server.js".into()
    } else {
        format!("/file-{}.js", context_len + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn html_mode_is_verbatim_with_fixed_path() {
        let raw = "<!DOCTYPE html>\nFILE: /ignored.js\n</html>";
        let out = split_output(raw, StackKind::Html, 0);
        assert_eq!(out.file_path, "index.html");
        assert_eq!(out.code, raw);
    }

    #[test]
    fn mern_marker_line_is_extracted_and_removed() {
        let raw = "FILE: /server/models/User.js\nconst mongoose = require('mongoose');\nmodule.exports = mongoose.model('User', schema);";
        let out = split_output(raw, StackKind::Mern, 0);
        assert_eq!(out.file_path, "/server/models/User.js");
        assert_eq!(
            out.code,
            "const mongoose = require('mongoose');\nmodule.exports = mongoose.model('User', schema);"
        );
        assert!(!out.code.contains("FILE:"));
    }

    #[test]
    fn marker_trailing_whitespace_is_trimmed() {
        let raw = "FILE:   /client/src/App.jsx   \nexport default App;";
        let out = split_output(raw, StackKind::Mern, 3);
        assert_eq!(out.file_path, "/client/src/App.jsx");
        assert_eq!(out.code, "export default App;");
    }

    #[test]
    fn marker_anywhere_in_text_is_honored() {
        let raw = "some preamble\nFILE: /server/routes/api.js\nrouter.get('/x');";
        let out = split_output(raw, StackKind::Mern, 0);
        assert_eq!(out.file_path, "/server/routes/api.js");
        assert_eq!(out.code, "some preamble\n\nrouter.get('/x');");
    }

    #[test]
    fn only_first_marker_wins() {
        let raw = "FILE: /a.js\ncode\nFILE: /b.js\nmore";
        let out = split_output(raw, StackKind::Mern, 0);
        assert_eq!(out.file_path, "/a.js");
        assert!(out.code.contains("FILE: /b.js"));
    }

    #[test]
    fn indented_marker_is_not_a_marker() {
        let raw = "  FILE: /a.js\ncode";
        let out = split_output(raw, StackKind::Mern, 0);
        assert_eq!(out.file_path, "/server.js");
        assert_eq!(out.code, raw);
    }

    #[test]
    fn missing_marker_defaults_to_server_js_on_first_turn() {
        let out = split_output("const x = 1;", StackKind::Mern, 0);
        assert_eq!(out.file_path, "/server.js");
        assert_eq!(out.code, "const x = 1;");
    }

    #[test]
    fn missing_marker_defaults_to_numbered_file_on_later_turns() {
        let out = split_output("const x = 1;", StackKind::Mern, 1);
        assert_eq!(out.file_path, "/file-2.js");
        let out = split_output("const x = 1;", StackKind::Mern, 4);
        assert_eq!(out.file_path, "/file-5.js");
    }
}
