//! Fixed Arabic literals recognized in attendance sheets.

/// Label of the student-name column; marks the real header row.
pub const HEADER_MARKER: &str = "اسم الطالب";

/// Substrings identifying the weekly attendance columns, week 1 to 4.
pub const ATTENDANCE_KEYWORDS: [&str; 4] = [
    "الحضور والغياب الاسبوع الأول",
    "الحضور والغياب الاسبوع الثاني",
    "الحضور والغياب الاسبوع الثالث",
    "الحضور والغياب الاسبوع الرابع",
];

pub const PRESENT_LITERAL: &str = "ملتزم بالحضور";
pub const MODERATE_LITERAL: &str = "متوسط الالتزام";
pub const ABSENT_LITERAL: &str = "لا يحضر";

/// Returns the week number (1-based) of the first keyword contained in `name`.
pub fn attendance_week(name: &str) -> Option<usize> {
    ATTENDANCE_KEYWORDS
        .iter()
        .position(|keyword| name.contains(keyword))
        .map(|idx| idx + 1)
}

/// True if `name` contains any attendance keyword.
pub fn is_attendance_column(name: &str) -> bool {
    attendance_week(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_is_resolved_from_substring() {
        assert_eq!(
            attendance_week("الحضور والغياب الاسبوع الثالث_1"),
            Some(3)
        );
        assert_eq!(attendance_week("اسم الطالب"), None);
    }
}
