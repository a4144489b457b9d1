/// Compiles a regex once and hands out a `&'static Regex` afterwards.
macro_rules! regex {
    ($pattern:expr) => {{
        use regex::Regex;
        use std::sync::OnceLock;

        static REGEX: OnceLock<Regex> = OnceLock::new();
        REGEX.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}
