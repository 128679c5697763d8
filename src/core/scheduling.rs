use crate::domain::model::ContactSubmission;
use crate::utils::error::Result;
use url::Url;

const CONTACT_PARAMS: [&str; 4] = ["embed", "email", "firstName", "lastName"];

/// 會議排程連結：固定的 base URL 加上聯絡人資訊作為 query 參數
#[derive(Debug, Clone)]
pub struct SchedulingLink {
    base: Url,
    embed: bool,
}

impl SchedulingLink {
    pub fn parse(base: &str) -> Result<Self> {
        Ok(Self {
            base: Url::parse(base)?,
            embed: false,
        })
    }

    /// 內嵌排程器用的連結：`{meetings_base}/{slug}?embed=true`
    pub fn embedded(meetings_base: &str, slug: &str) -> Result<Self> {
        let mut root = Url::parse(meetings_base)?;
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        Ok(Self {
            base: root.join(slug)?,
            embed: true,
        })
    }

    /// 產生預先填好資料的連結；base 上同名參數會被覆蓋
    pub fn for_contact(&self, contact: &ContactSubmission) -> Url {
        let mut url = self.base.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !CONTACT_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(kept);
            if self.embed {
                query.append_pair("embed", "true");
            }
            query
                .append_pair("email", &contact.email)
                .append_pair("firstName", &contact.first_name)
                .append_pair("lastName", &contact.last_name);
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> ContactSubmission {
        ContactSubmission {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane@acme.com".to_string(),
        }
    }

    #[test]
    fn test_link_carries_contact_params() {
        let link = SchedulingLink::parse("https://meetings.hubspot.com/joseph792").unwrap();
        let url = link.for_contact(&jane()).to_string();
        assert_eq!(
            url,
            "https://meetings.hubspot.com/joseph792?email=jane%40acme.com&firstName=Jane&lastName=Smith"
        );
    }

    #[test]
    fn test_existing_params_are_replaced_not_duplicated() {
        let link =
            SchedulingLink::parse("https://meetings.hubspot.com/joseph792?uuid=abc&email=old%40x.com")
                .unwrap();
        let url = link.for_contact(&jane());
        let emails: Vec<_> = url.query_pairs().filter(|(k, _)| k == "email").collect();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].1, "jane@acme.com");
        assert!(url.query_pairs().any(|(k, v)| k == "uuid" && v == "abc"));
    }

    #[test]
    fn test_embedded_link() {
        let link = SchedulingLink::embedded("https://meetings.hubspot.com/", "joseph792").unwrap();
        let mut contact = jane();
        contact.last_name = "van Dijk".to_string();
        let url = link.for_contact(&contact);
        assert_eq!(url.path(), "/joseph792");
        assert!(url.query_pairs().any(|(k, v)| k == "embed" && v == "true"));
        assert!(url.query_pairs().any(|(k, v)| k == "lastName" && v == "van Dijk"));
    }

    #[test]
    fn test_rejects_relative_base() {
        assert!(SchedulingLink::parse("meetings/joseph792").is_err());
    }
}
