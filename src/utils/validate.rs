use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{AmsError, Result};

static COURSE_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2,5} ?[0-9]{3,4}[A-Z]?$").expect("Invalid course code regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

/// 必填文本字段
pub fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AmsError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_course_code(code: &str) -> Result<()> {
    // 课程代码格式：2-5 个大写字母 + 3-4 位数字，可带一个后缀字母
    if !COURSE_CODE_RE.is_match(code.trim()) {
        return Err(AmsError::validation(
            "Course code must look like CS101 or MATH 2040",
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(AmsError::validation("Email format is invalid"));
    }
    Ok(())
}

pub fn validate_total_marks(total_marks: f64) -> Result<()> {
    if !total_marks.is_finite() || total_marks <= 0.0 {
        return Err(AmsError::validation("Total marks must be greater than zero"));
    }
    Ok(())
}

/// 分数必须落在 [0, total_marks]
pub fn validate_score(score: f64, total_marks: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 || score > total_marks {
        return Err(AmsError::validation(format!(
            "Score must be between 0 and {total_marks}"
        )));
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含：字母 + 数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    // 1. 长度检查：至少 8 个字符
    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    // 2. 字母检查
    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    // 3. 数字检查
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    // 4. 常见弱密码检查
    let weak_passwords = ["password1", "12345678a", "qwerty123", "admin123", "abcd1234"];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<()> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(AmsError::validation(result.error_message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_valid);
        assert!(validate_password("marking2026").is_valid);
    }

    #[test]
    fn test_short_password() {
        let result = validate_password("Ab1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );
        assert_eq!(validate_password_simple("Ab1").unwrap_err().code(), "E001");
    }

    #[test]
    fn test_no_digit() {
        let result = validate_password("AbcdEfgh");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_common_password() {
        let result = validate_password("Admin123");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }

    #[test]
    fn test_course_code() {
        assert!(validate_course_code("CS101").is_ok());
        assert!(validate_course_code("MATH 2040").is_ok());
        assert!(validate_course_code("ENG210A").is_ok());
        assert!(validate_course_code("cs101").is_err());
        assert!(validate_course_code("C1").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("ama@uni.edu.gh").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_marks() {
        assert!(validate_total_marks(60.0).is_ok());
        assert!(validate_total_marks(0.0).is_err());
        assert!(validate_score(45.0, 60.0).is_ok());
        assert!(validate_score(60.0, 60.0).is_ok());
        assert!(validate_score(61.0, 60.0).is_err());
        assert!(validate_score(-1.0, 60.0).is_err());
    }

    #[test]
    fn test_required() {
        assert!(validate_required("Title", "Quiz 1").is_ok());
        assert_eq!(
            validate_required("Title", "  ").unwrap_err().message(),
            "Title is required"
        );
    }
}
