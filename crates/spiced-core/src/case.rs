//! Word splitting and case conversion.
//!
//! Words are split the way lodash does it, since every deployed resource
//! name was derived with lodash: Latin accents are folded to ASCII,
//! apostrophes vanish, and words break on separators, on lower→upper
//! transitions, between letters and digits, and before the last capital of
//! an acronym (`XMLHttp` → `XML`, `Http`).
//!
//! Only ASCII capitals (what is left of Latin after folding) open a word.
//! Letters of other scripts count as lowercase, so `ИванПетров` stays one
//! word while `ИванPetrov` splits.

/// Split a string into words.
pub fn words(input: &str) -> Vec<String> {
    let folded = deburr(input);
    let mut words = Vec::new();
    for run in folded.split(|c: char| !c.is_alphanumeric()) {
        if !run.is_empty() {
            split_run(run, &mut words);
        }
    }
    words
}

/// `camelCase`: every word lowercased, all but the first capitalised.
pub fn camel_case(input: &str) -> String {
    words(input)
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let lower = word.to_lowercase();
            if index == 0 { lower } else { upper_first(&lower) }
        })
        .collect()
}

/// `PascalCase`, i.e. [`upper_first`] of [`camel_case`].
pub fn pascal_case(input: &str) -> String {
    upper_first(&camel_case(input))
}

/// `kebab-case`.
pub fn kebab_case(input: &str) -> String {
    join_lowercase(input, "-")
}

/// `snake_case`.
pub fn snake_case(input: &str) -> String {
    join_lowercase(input, "_")
}

/// `UPPER_SNAKE_CASE`.
pub fn upper_snake_case(input: &str) -> String {
    snake_case(input).to_uppercase()
}

/// Uppercase the first character, leave the rest untouched.
pub fn upper_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn join_lowercase(input: &str, separator: &str) -> String {
    words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

fn split_run(run: &str, words: &mut Vec<String>) {
    let chars: Vec<char> = run.chars().collect();
    let mut start = 0;
    for i in 1..chars.len() {
        let prev = chars[i - 1];
        let cur = chars[i];
        let next = chars.get(i + 1).copied();

        let boundary = (is_lower(prev) && cur.is_ascii_uppercase())
            || prev.is_alphabetic() != cur.is_alphabetic()
            || (prev.is_ascii_uppercase()
                && cur.is_ascii_uppercase()
                && next.is_some_and(is_lower));

        if boundary {
            words.push(chars[start..i].iter().collect());
            start = i;
        }
    }
    words.push(chars[start..].iter().collect());
}

/// Letters other than ASCII capitals.
fn is_lower(c: char) -> bool {
    c.is_alphabetic() && !c.is_ascii_uppercase()
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0xFE20..=0xFE2F | 0x20D0..=0x20FF)
}

/// Fold Latin-1 Supplement and Latin Extended-A letters to basic Latin and
/// strip combining marks and apostrophes.
fn deburr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if is_apostrophe(c) || is_combining_mark(c) {
            continue;
        }
        match fold(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

/// Pick `upper` or `lower` for code points that alternate case starting
/// with an uppercase letter at `start`.
fn alternating(c: char, start: u32, upper: &'static str, lower: &'static str) -> &'static str {
    if (c as u32 - start) % 2 == 0 { upper } else { lower }
}

fn fold(c: char) -> Option<&'static str> {
    let folded = match c as u32 {
        0xC0..=0xC5 => "A",
        0xC6 => "Ae",
        0xC7 => "C",
        0xC8..=0xCB => "E",
        0xCC..=0xCF => "I",
        0xD0 => "D",
        0xD1 => "N",
        0xD2..=0xD6 | 0xD8 => "O",
        0xD9..=0xDC => "U",
        0xDD => "Y",
        0xDE => "Th",
        0xDF => "ss",
        0xE0..=0xE5 => "a",
        0xE6 => "ae",
        0xE7 => "c",
        0xE8..=0xEB => "e",
        0xEC..=0xEF => "i",
        0xF0 => "d",
        0xF1 => "n",
        0xF2..=0xF6 | 0xF8 => "o",
        0xF9..=0xFC => "u",
        0xFD | 0xFF => "y",
        0xFE => "th",
        0x100..=0x105 => alternating(c, 0x100, "A", "a"),
        0x106..=0x10D => alternating(c, 0x106, "C", "c"),
        0x10E..=0x111 => alternating(c, 0x10E, "D", "d"),
        0x112..=0x11B => alternating(c, 0x112, "E", "e"),
        0x11C..=0x123 => alternating(c, 0x11C, "G", "g"),
        0x124..=0x127 => alternating(c, 0x124, "H", "h"),
        0x128..=0x131 => alternating(c, 0x128, "I", "i"),
        0x132 => "IJ",
        0x133 => "ij",
        0x134 => "J",
        0x135 => "j",
        0x136 => "K",
        0x137 | 0x138 => "k",
        0x139..=0x142 => alternating(c, 0x139, "L", "l"),
        0x143..=0x148 => alternating(c, 0x143, "N", "n"),
        0x149 => "'n",
        0x14A => "N",
        0x14B => "n",
        0x14C..=0x151 => alternating(c, 0x14C, "O", "o"),
        0x152 => "Oe",
        0x153 => "oe",
        0x154..=0x159 => alternating(c, 0x154, "R", "r"),
        0x15A..=0x161 => alternating(c, 0x15A, "S", "s"),
        0x162..=0x167 => alternating(c, 0x162, "T", "t"),
        0x168..=0x173 => alternating(c, 0x168, "U", "u"),
        0x174 => "W",
        0x175 => "w",
        0x176 | 0x178 => "Y",
        0x177 => "y",
        0x179..=0x17E => alternating(c, 0x179, "Z", "z"),
        0x17F => "s",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_concatenated_pascal_words() {
        assert_eq!(
            words("SpicedlingFinalProjectJasmineDanielStreif"),
            vec!["Spicedling", "Final", "Project", "Jasmine", "Daniel", "Streif"]
        );
    }

    #[test]
    fn splits_on_separators_and_acronyms() {
        assert_eq!(words("Node Server"), vec!["Node", "Server"]);
        assert_eq!(words("__foo-bar__"), vec!["foo", "bar"]);
        assert_eq!(words("XMLHttpRequest"), vec!["XML", "Http", "Request"]);
        assert_eq!(words("SESSION_SECRET"), vec!["SESSION", "SECRET"]);
        assert_eq!(words("node2server"), vec!["node", "2", "server"]);
    }

    #[test]
    fn folds_accents_and_drops_apostrophes() {
        assert_eq!(words("Gonçalves da Silva"), vec!["Goncalves", "da", "Silva"]);
        assert_eq!(camel_case("O'Neill"), "oNeill");
        assert_eq!(kebab_case("Łukasz Żółć"), "lukasz-zolc");
        assert_eq!(camel_case("Straße"), "strasse");
    }

    #[test]
    fn non_latin_capitals_do_not_split() {
        assert_eq!(words("ИванПетров"), vec!["ИванПетров"]);
        assert_eq!(words("ИванPetrov"), vec!["Иван", "Petrov"]);
        assert_eq!(words("fooИван"), vec!["fooИван"]);
        assert_eq!(kebab_case("Иван Петров"), "иван-петров");
    }

    #[test]
    fn camel_case_matches_lodash() {
        assert_eq!(camel_case("Foo Bar"), "fooBar");
        assert_eq!(camel_case("--foo-bar--"), "fooBar");
        assert_eq!(camel_case("__FOO_BAR__"), "fooBar");
        assert_eq!(camel_case("Node Server"), "nodeServer");
        assert_eq!(
            camel_case("SpicedlingFinalProjectJasmineMagaliGonçalves da Silva"),
            "spicedlingFinalProjectJasmineMagaliGoncalvesDaSilva"
        );
    }

    #[test]
    fn kebab_and_snake_case() {
        assert_eq!(kebab_case("Node Server"), "node-server");
        assert_eq!(kebab_case("fooBar"), "foo-bar");
        assert_eq!(snake_case("Foo Bar"), "foo_bar");
        assert_eq!(
            upper_snake_case("SpicedlingFinalProjectServicesJasmineDanielStreif_SESSION_SECRET"),
            "SPICEDLING_FINAL_PROJECT_SERVICES_JASMINE_DANIEL_STREIF_SESSION_SECRET"
        );
    }

    #[test]
    fn upper_first_only_touches_first_char() {
        assert_eq!(upper_first("jasmine"), "Jasmine");
        assert_eq!(upper_first("fooBAR"), "FooBAR");
        assert_eq!(upper_first(""), "");
        assert_eq!(pascal_case("node server"), "NodeServer");
    }

    #[test]
    fn empty_and_separator_only_inputs() {
        assert!(words("").is_empty());
        assert!(words(" - _ ").is_empty());
        assert_eq!(camel_case(""), "");
        assert_eq!(kebab_case("!!"), "");
    }
}
