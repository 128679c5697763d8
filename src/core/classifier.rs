use std::collections::HashSet;
use std::sync::LazyLock;

/// 常見的免費信箱網域，收到這些網域一律視為非企業信箱
pub const FREE_EMAIL_DOMAINS: [&str; 25] = [
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "mail.com",
    "protonmail.com",
    "zoho.com",
    "yandex.com",
    "live.com",
    "msn.com",
    "me.com",
    "mac.com",
    "inbox.com",
    "gmx.com",
    "fastmail.com",
    "hey.com",
    "pm.me",
    "proton.me",
    "tutanota.com",
    "yahoo.co.uk",
    "googlemail.com",
    "rocketmail.com",
    "ymail.com",
];

static FREE_DOMAIN_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| FREE_EMAIL_DOMAINS.into_iter().collect());

/// 取出最後一個 `@` 之後的網域；沒有 `@` 或網域為空時回傳 None
pub fn email_domain(email: &str) -> Option<&str> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}

pub fn is_free_email_domain(domain: &str) -> bool {
    FREE_DOMAIN_SET.contains(domain.to_lowercase().as_str())
}

/// 企業信箱：取得到網域，且網域不在免費信箱清單內
pub fn is_business_email(email: &str) -> bool {
    match email_domain(email) {
        Some(domain) => !is_free_email_domain(domain),
        None => false,
    }
}
