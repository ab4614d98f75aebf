//! Technology icon sizing.

/// Force the first `width=` and `height=` attributes to `{size}em`.
///
/// A quoted value ends at its closing quote, an unquoted one at whitespace,
/// `>` or `/`. Only whole attribute names match, so `stroke-width=` is left
/// alone. Text that is not an SVG is returned unchanged.
pub fn resize_svg(svg: &str, size: u32) -> String {
    if !svg.contains("svg") {
        return svg.to_owned();
    }
    let mut svg = svg.to_owned();
    set_attribute(&mut svg, "width", size);
    set_attribute(&mut svg, "height", size);
    svg
}

fn set_attribute(svg: &mut String, name: &str, size: u32) {
    let pattern = format!("{name}=");
    let Some(start) = svg.match_indices(&pattern).map(|(at, _)| at).find(|&at| {
        svg[..at]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace)
    }) else {
        return;
    };

    let value_start = start + pattern.len();
    let value = &svg[value_start..];
    let value_len = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => match value[1..].find(quote) {
            Some(len) => len + 2,
            None => return,
        },
        _ => value
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(value.len()),
    };

    svg.replace_range(start..value_start + value_len, &format!("{name}=\"{size}em\""));
}
