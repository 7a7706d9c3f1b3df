/// Wraps every blank-line separated block in `<p>` tags, one block per line.
pub fn wrap_paragraphs(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    text.split("\n\n")
        .map(str::trim)
        .filter(|paragraph| !paragraph.is_empty())
        .map(|paragraph| format!("<p>{}</p>", paragraph))
        .collect::<Vec<String>>()
        .join("\n")
}
