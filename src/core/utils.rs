use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};

/// Locks a mutex, recovering the guard if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{2E80}'..='\u{2FDF}'   // radicals supplement, Kangxi radicals
        | '\u{3005}'..='\u{3007}'
        | '\u{3021}'..='\u{3029}' // Hangzhou numerals (〡 is radical 2)
        | '\u{31C0}'..='\u{31EF}' // strokes
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{3134F}')
}

pub fn is_single_character(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some() && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character_counts_code_points() {
        assert!(is_single_character("爱"));
        assert!(is_single_character("𠂇")); // outside the BMP
        assert!(!is_single_character(""));
        assert!(!is_single_character("爱你"));
    }

    #[test]
    fn test_is_cjk() {
        assert!(is_cjk('雪'));
        assert!(is_cjk('〡'));
        assert!(is_cjk('⺮'));
        assert!(!is_cjk('a'));
        assert!(!is_cjk(' '));
    }
}
