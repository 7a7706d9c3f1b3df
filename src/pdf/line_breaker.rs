use crate::pdf::fonts::{FontFace, TextMeasure};

/// A piece of a line drawn in one face, `x` relative to the start of the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub face: FontFace,
    pub x: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub segments: Vec<Segment>,
    pub width: f32,
}

impl Line {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

struct LineBreaker<'a> {
    measure: &'a dyn TextMeasure,
    size: f32,
    max_width: f32,
    lines: Vec<Line>,
    current: Line,
    pending_space: Option<FontFace>,
}

impl<'a> LineBreaker<'a> {
    fn finish_line(&mut self) {
        let line = std::mem::take(&mut self.current);
        self.lines.push(line);
        self.pending_space = None;
    }

    fn append(&mut self, text: &str, face: FontFace, width: f32) {
        match self.current.segments.last_mut() {
            Some(last) if last.face == face => last.text.push_str(text),
            _ => self.current.segments.push(Segment {
                text: text.to_string(),
                face,
                x: self.current.width,
            }),
        }
        self.current.width += width;
    }

    fn push_word(&mut self, word: &str, face: FontFace) {
        let width = self.measure.text_width(word, face, self.size);
        let space = match self.pending_space {
            Some(space_face) if !self.current.is_empty() => {
                Some((space_face, self.measure.text_width(" ", space_face, self.size)))
            }
            _ => None,
        };
        let space_width = space.map_or(0.0, |(_, w)| w);

        if !self.current.is_empty() && self.current.width + space_width + width > self.max_width {
            self.finish_line();
        } else if let Some((space_face, w)) = space {
            self.append(" ", space_face, w);
        }
        self.pending_space = None;

        if width > self.max_width && self.current.is_empty() {
            self.push_long_word(word, face);
        } else {
            self.append(word, face, width);
        }
    }

    // Words wider than the column, long URLs mostly, are cut wherever they overflow
    fn push_long_word(&mut self, word: &str, face: FontFace) {
        let mut chunk = String::new();
        for c in word.chars() {
            chunk.push(c);
            let width = self.measure.text_width(&chunk, face, self.size);
            if width > self.max_width && chunk.chars().count() > 1 {
                chunk.pop();
                let chunk_width = self.measure.text_width(&chunk, face, self.size);
                self.append(&chunk, face, chunk_width);
                self.finish_line();
                chunk.clear();
                chunk.push(c);
            }
        }
        if !chunk.is_empty() {
            let width = self.measure.text_width(&chunk, face, self.size);
            self.append(&chunk, face, width);
        }
    }
}

/// Greedy line filling of styled text into a column `max_width` millimetres wide.
/// A `"\n"` run forces a break; whitespace between words is collapsed.
pub fn break_lines(runs: &[(String, FontFace)], size: f32, max_width: f32, measure: &dyn TextMeasure) -> Vec<Line> {
    let mut breaker = LineBreaker {
        measure,
        size,
        max_width,
        lines: vec![],
        current: Line::default(),
        pending_space: None,
    };

    for (text, face) in runs {
        if text == "\n" {
            breaker.finish_line();
            continue;
        }

        let mut word = String::new();
        for c in text.chars() {
            if c.is_whitespace() && c != '\u{a0}' {
                if !word.is_empty() {
                    breaker.push_word(&word, *face);
                    word.clear();
                }
                breaker.pending_space = Some(*face);
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            breaker.push_word(&word, *face);
        }
    }

    if !breaker.current.is_empty() {
        breaker.finish_line();
    }

    breaker.lines
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every character is 2mm wide at any size.
    pub(crate) struct FixedWidth;

    impl TextMeasure for FixedWidth {
        fn text_width(&self, text: &str, _face: FontFace, _size: f32) -> f32 {
            text.chars().count() as f32 * 2.0
        }
    }

    fn plain(text: &str) -> Vec<(String, FontFace)> {
        vec![(text.to_string(), FontFace::Regular)]
    }

    #[test]
    fn test_fits_on_one_line() {
        let lines = break_lines(&plain("hello world"), 12.0, 100.0, &FixedWidth);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "hello world");
        assert_eq!(lines[0].width, 22.0);
    }

    #[test]
    fn test_wraps_on_words() {
        // 10 characters per line
        let lines = break_lines(&plain("aaa bbb ccc ddd"), 12.0, 20.0, &FixedWidth);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["aaa bbb", "ccc ddd"]);
    }

    #[test]
    fn test_forced_break() {
        let runs = vec![
            ("one".to_string(), FontFace::Regular),
            ("\n".to_string(), FontFace::Regular),
            ("two".to_string(), FontFace::Regular),
        ];
        let lines = break_lines(&runs, 12.0, 100.0, &FixedWidth);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn test_segments_keep_faces() {
        let runs = vec![
            ("By ".to_string(), FontFace::Regular),
            ("Jane".to_string(), FontFace::Bold),
            (" wrote".to_string(), FontFace::Regular),
        ];
        let lines = break_lines(&runs, 12.0, 100.0, &FixedWidth);
        assert_eq!(lines[0].segments, vec![
            Segment { text: "By ".to_string(), face: FontFace::Regular, x: 0.0 },
            Segment { text: "Jane".to_string(), face: FontFace::Bold, x: 6.0 },
            Segment { text: " wrote".to_string(), face: FontFace::Regular, x: 14.0 },
        ]);
    }

    #[test]
    fn test_long_word_is_split() {
        let lines = break_lines(&plain("abcdefghijklmnop"), 12.0, 10.0, &FixedWidth);
        let texts: Vec<String> = lines.iter().map(|l| l.text()).collect();
        assert_eq!(texts, ["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn test_empty() {
        assert!(break_lines(&plain("   "), 12.0, 10.0, &FixedWidth).is_empty());
        assert!(break_lines(&[], 12.0, 10.0, &FixedWidth).is_empty());
    }
}
