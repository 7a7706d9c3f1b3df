use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CAPTION_REGEX: Regex = Regex::new(
        r#"(?s)\[caption id="(?P<id>.*?)" align="(?P<align>.*?)" width="(?P<width>.*?)"\](?P<inner>.*?)\[/caption\]"#
    ).unwrap();

    static ref INNER_REGEX: Regex = Regex::new(r"(?s)^(?P<img><img.*?/>)(?P<text>.*?)$").unwrap();
}

/// Expands `[caption id=".." align=".." width=".."]<img .../> text[/caption]` into a
/// `<figure>` block. A shortcode whose body is not an image followed by text is kept verbatim.
pub fn expand_captions(content: &str) -> String {
    CAPTION_REGEX.replace_all(content, |caps: &Captures| {
        let inner = caps["inner"].trim();
        let Some(inner_caps) = INNER_REGEX.captures(inner) else {
            return caps[0].to_string();
        };

        let img = inner_caps["img"].trim();
        let text = inner_caps["text"].trim();

        let mut html = format!("<figure id=\"{}\" class=\"{}\" style=\"width:{}px\">\n",
                               &caps["id"], &caps["align"], &caps["width"]);
        html.push_str(&format!("  {}\n", img));
        html.push_str(&format!("  <figcaption>{}</figcaption>\n", text));
        html.push_str("</figure>\n");
        html
    }).to_string()
}
