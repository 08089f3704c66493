use std::cmp::Ordering;

/// Natural-order string comparison.
///
/// Strings are split into runs of ASCII digits and non-digits. Digit runs
/// compare by numeric value ("file2" < "file10"), text runs compare
/// case-insensitively, and a digit run sorts before a text run. Remaining
/// ties fall back to length and then to plain byte order, so the ordering
/// is total.
pub fn alphanumeric_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs::new(a);
    let mut right = Runs::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ordering = compare_runs(l, r);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }

    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn compare_runs(l: &str, r: &str) -> Ordering {
    match (is_digit_run(l), is_digit_run(r)) {
        (true, true) => compare_numbers(l, r),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => l
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(r.chars().flat_map(char::to_lowercase)),
    }
}

/// Compare digit runs of any length without parsing them
fn compare_numbers(l: &str, r: &str) -> Ordering {
    let l = l.trim_start_matches('0');
    let r = r.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

fn is_digit_run(run: &str) -> bool {
    run.as_bytes().first().is_some_and(u8::is_ascii_digit)
}

/// Iterator over maximal digit / non-digit runs
struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Runs<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Runs<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.as_bytes().first()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digits)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(run)
    }
}
