//! Property-based tests for domain validation
//!
//! These cover the prefix rules and the presence check for arbitrary values.

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDomain, DomainValidator, EnvMap};
    use proptest::prelude::*;

    prop_compose! {
        fn https_url()(host in "[a-z][a-z0-9-]{0,20}", tld in "(co|io|com)") -> String {
            format!("https://{host}.supabase.{tld}")
        }
    }

    prop_compose! {
        fn bearer_token()(body in "[A-Za-z0-9%]{8,40}") -> String {
            format!("AAAA{body}")
        }
    }

    fn extraction_env(token: &str, url: &str, anon: &str) -> EnvMap {
        EnvMap::from([
            ("TWITTER_BEARER_TOKEN".to_string(), token.to_string()),
            ("SUPABASE_URL".to_string(), url.to_string()),
            ("SUPABASE_ANON_KEY".to_string(), anon.to_string()),
        ])
    }

    fn orchestration_env(url: &str, service: &str) -> EnvMap {
        EnvMap::from([
            ("SUPABASE_URL".to_string(), url.to_string()),
            ("SUPABASE_SERVICE_ROLE_KEY".to_string(), service.to_string()),
        ])
    }

    fn non_https_url() -> impl Strategy<Value = String> {
        "[a-z]{1,10}://[a-z.]{1,20}".prop_filter("not https", |u| !u.starts_with("https://"))
    }

    proptest! {
        #[test]
        fn well_formed_extraction_is_valid(
            token in bearer_token(),
            url in https_url(),
            anon in "[A-Za-z0-9._-]{1,40}",
        ) {
            let result = DomainValidator::validate_env(
                &ConfigDomain::extraction(),
                &extraction_env(&token, &url, &anon),
            );
            prop_assert!(result.is_valid());
        }

        #[test]
        fn non_https_url_always_flagged(
            token in bearer_token(),
            url in non_https_url(),
        ) {
            let result = DomainValidator::validate_env(
                &ConfigDomain::extraction(),
                &extraction_env(&token, &url, "anon"),
            );
            prop_assert!(!result.is_valid());
            prop_assert!(result.missing_keys.is_empty());
            prop_assert!(result.violations.iter().any(|v| v.key == "SUPABASE_URL"));
        }

        #[test]
        fn orchestration_non_https_url_flagged(
            url in non_https_url(),
            service in "[A-Za-z0-9._-]{1,40}",
        ) {
            let result = DomainValidator::validate_env(
                &ConfigDomain::orchestration(),
                &orchestration_env(&url, &service),
            );
            prop_assert!(!result.is_valid());
            prop_assert!(result.missing_keys.is_empty());
            prop_assert_eq!(result.violations.len(), 1);
            prop_assert_eq!(result.violations[0].key.as_str(), "SUPABASE_URL");
        }

        #[test]
        fn removing_one_required_key_reports_only_that_key(
            orchestration in any::<bool>(),
            index in 0usize..3,
            token in bearer_token(),
            url in https_url(),
            secret in "[A-Za-z0-9._-]{1,40}",
        ) {
            let (domain, mut env) = if orchestration {
                (ConfigDomain::orchestration(), orchestration_env(&url, &secret))
            } else {
                (ConfigDomain::extraction(), extraction_env(&token, &url, &secret))
            };
            prop_assert!(DomainValidator::validate_env(&domain, &env).is_valid());

            let key = domain.required_keys[index % domain.required_keys.len()].clone();
            env.remove(&key);

            let result = DomainValidator::validate_env(&domain, &env);
            prop_assert!(!result.is_valid());
            prop_assert_eq!(result.missing_keys, vec![key]);
            prop_assert!(result.violations.is_empty());
        }

        #[test]
        fn validation_is_repeatable(
            token in "[A-Z0-9]{0,12}",
            url in "(https?://)?[a-z.]{0,12}",
        ) {
            let domain = ConfigDomain::extraction();
            let env = extraction_env(&token, &url, "anon");
            let first = DomainValidator::validate_env(&domain, &env);
            let second = DomainValidator::validate_env(&domain, &env);
            prop_assert_eq!(first, second);
        }
    }
}
