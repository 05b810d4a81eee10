//! Value Objects

use std::fmt;

use uuid::Uuid;

use super::ValueObjectError;

/// Identity of one accepted connection.
///
/// Display names may collide, so the hub keys its live set by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 表示名（join 時に一度だけ設定され、以後変更されない）
///
/// 空文字列・空白のみの名前は受け付けない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        if name.trim().is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_accepts_non_empty_name() {
        // テスト項目: 空でない名前から DisplayName を生成できる
        // given (前提条件):
        let name = "Drôle Chat".to_string();

        // when (操作):
        let result = DisplayName::new(name);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "Drôle Chat");
    }

    #[test]
    fn test_display_name_rejects_empty_and_blank_names() {
        // テスト項目: 空文字列・空白のみの名前はエラーになる
        // given (前提条件):
        let candidates = ["", "   ", "\t\n"];

        for candidate in candidates {
            // when (操作):
            let result = DisplayName::try_from(candidate.to_string());

            // then (期待する結果):
            assert_eq!(result, Err(ValueObjectError::EmptyDisplayName));
        }
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成した ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
