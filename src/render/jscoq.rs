//! jsCoq page fragments: loader in `<head>`, start call before `</body>`.

/// Script tags added to the page head.
pub const HEAD: &str = "<script src=\"https://cdn.jsdelivr.net/npm/jscoq@0.17.1/dist/frontend/index.js\" type=\"module\"></script>\n\
<script src=\"jscoq-doc.js\"></script>\n";

/// CSS class marking a code block as an editable snippet.
pub const SNIPPET_CLASS: &str = "code jscoq";

/// Element id of the `n`th snippet of a page.
pub fn snippet_id(n: usize) -> String {
    format!("coq-snippet-{}", n)
}

/// Call handing every snippet id on the page to the loader.
pub fn start_script(snippet_ids: &[String]) -> String {
    let ids: Vec<String> = snippet_ids.iter().map(|id| format!("'{}'", id)).collect();
    format!(
        "<script type=\"module\">\n  coqdocStart([{}]);\n</script>\n",
        ids.join(", ")
    )
}
