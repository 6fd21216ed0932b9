//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum shared by every crate of the workspace.

use serde::Serialize;

/// エラー種別の列挙体
///
/// 駐車場システム全体で共通のエラー分類を定義します。
/// コンソールアプリでは各バリアントがプロセス終了コードにマッピングされます。
///
/// ## Notes
/// * `non_exhaustive` - 将来的に列挙子が追加される可能性があることを示す
///
/// ## Examples
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// let kind = ErrorKind::NotFound;
/// assert_eq!(kind.as_str(), "Not Found");
/// assert!(kind.is_user_facing());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// 入力値が不正（空の車両番号、未知の選択肢など）
    InvalidInput,
    /// 対象が見つからない（チケットなし）
    NotFound,
    /// 資源が枯渇している（空き駐車スペースなし）
    Unavailable,
    /// データの状態が不整合（出庫時刻が入庫時刻より前など）
    InvalidState,
    /// 永続化層の失敗（DBエラー、想定外の更新件数）
    Persistence,
    /// 内部エラー
    Internal,
}

impl ErrorKind {
    /// プロセス終了コードを取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::InvalidInput.exit_code(), 2);
    /// assert_eq!(ErrorKind::Persistence.exit_code(), 5);
    /// ```
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::InvalidInput => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Unavailable => 4,
            ErrorKind::Persistence => 5,
            ErrorKind::InvalidState => 6,
            ErrorKind::Internal => 70,
        }
    }

    /// ユーザー向けの文字列表現を取得
    ///
    /// ## Examples
    /// ```rust
    /// use kernel::error::kind::ErrorKind;
    /// assert_eq!(ErrorKind::Unavailable.as_str(), "Unavailable");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid Input",
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Unavailable => "Unavailable",
            ErrorKind::InvalidState => "Invalid State",
            ErrorKind::Persistence => "Persistence Error",
            ErrorKind::Internal => "Internal Error",
        }
    }

    /// ユーザーの操作で起きる想定内のエラーかどうか
    ///
    /// `true` の場合は利用者に案内するだけで、リクエストは単に進まない。
    #[inline]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidInput | ErrorKind::NotFound | ErrorKind::Unavailable
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
