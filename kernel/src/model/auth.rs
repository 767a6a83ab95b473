/// 検証済みセッションを指すアクセストークン。発行は外部のアイデンティティ基盤が行う。
pub struct AccessToken(pub String);
