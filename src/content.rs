//! Markdown documents built from separately edited form sections.

/// Joins `(heading, text)` pairs into one markdown document.
///
/// Each section with non-blank text becomes `## {heading}` followed by the
/// trimmed text; blank sections are dropped. Sections are separated by a blank line.
pub fn assemble_content<'a, I>(sections: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    sections
        .into_iter()
        .filter_map(|(heading, text)| {
            let text = text.trim();
            (!text.is_empty()).then(|| format!("## {heading}\n\n{text}"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
