use globset::{Glob, GlobMatcher};

use crate::spec::SelectSourceError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

pub(crate) fn compile_pattern(pattern: &str) -> Result<GlobMatcher, SelectSourceError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|e| SelectSourceError::InvalidPattern(format!("Invalid source pattern: {e}")))
}

pub(crate) fn is_name_matching(name_file: &str, matcher: &GlobMatcher) -> bool {
    matcher.is_match(name_file)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_pattern_matches_basename_only() {
        let matcher = compile_pattern("Data_Relawan_Lengkap_*.csv").expect("compile");
        assert!(is_name_matching(
            "Data_Relawan_Lengkap_2024-01-01_00-00-00.csv",
            &matcher
        ));
        assert!(!is_name_matching(
            "Data_Relawan_Lengkap_2024-01-01_00-00-00.xlsx",
            &matcher
        ));
        assert!(!is_name_matching("Detail_Keluarga_Relawan_1.csv", &matcher));
    }

    #[test]
    fn test_compile_pattern_rejects_unclosed_class() {
        let err = compile_pattern("Data_[.csv").expect_err("must fail");
        assert!(matches!(err, SelectSourceError::InvalidPattern(_)));
    }
}
