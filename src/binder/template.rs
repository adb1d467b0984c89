use crate::error::GraphError;
use ahash::AHashMap;
use itertools::Itertools;

/// Separator joining the parts of generated output names.
pub const OUTPUT_NAME_SEPARATOR: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(String),
}

/// A text template with `{name}` placeholders. `{{` and `}}` produce literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, GraphError> {
        let malformed = |reason: &str| GraphError::MalformedTemplate {
            template: source.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(malformed("nested '{' in placeholder")),
                            Some(ch) => name.push(ch),
                            None => return Err(malformed("unclosed '{'")),
                        }
                    }
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(malformed("empty placeholder"));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                '}' => return Err(malformed("unmatched '}'")),
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Placeholder(name) => Some(name.as_str()),
                Segment::Text(_) => None,
            })
            .unique()
            .collect()
    }

    /// Replaces every placeholder with its value. Values are inserted verbatim.
    pub fn render(&self, values: &Substitutions) -> Result<String, GraphError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value =
                        values
                            .get(name)
                            .ok_or_else(|| GraphError::MissingPlaceholder {
                                template: self.source.clone(),
                                name: name.clone(),
                            })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Named values available to template placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: AHashMap<String, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl ToString) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: ToString> FromIterator<(K, V)> for Substitutions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut subs = Self::new();
        for (k, v) in iter {
            subs.insert(k.as_ref(), v);
        }
        subs
    }
}

/// Renders a template source in one step.
pub fn render(source: &str, values: &Substitutions) -> Result<String, GraphError> {
    Template::parse(source)?.render(values)
}

/// Appends trigger tokens to a base prompt, space separated, in the given order.
///
/// With no triggers the base prompt is returned unchanged.
pub fn join_triggers<I, S>(base_prompt: &str, triggers: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let triggers = triggers.into_iter().map(|t| t.as_ref().to_string()).join(" ");
    if triggers.is_empty() {
        base_prompt.to_string()
    } else {
        format!("{} {}", base_prompt, triggers)
    }
}

/// Joins name parts with [`OUTPUT_NAME_SEPARATOR`]. Parts are not escaped, so callers
/// must not pass parts that already contain the separator if they need to split again.
pub fn output_name<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parts
        .into_iter()
        .map(|p| p.as_ref().to_string())
        .join(&OUTPUT_NAME_SEPARATOR.to_string())
}
