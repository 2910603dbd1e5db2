use super::*;

fn client() -> ContentClient {
    ContentClient::new(Arc::new(GalleryConfig::default())).expect("client")
}

#[test]
fn configured_hosts_are_trusted() {
    let c = client();
    assert!(c.is_trusted("https://api.github.com/repos/o/r/contents/x"));
    assert!(c.is_trusted("https://raw.githubusercontent.com/o/r/main/a%20b.json"));
    assert!(c.is_trusted("https://api.github.com:443/repos"));
}

#[test]
fn look_alike_hosts_are_not_trusted() {
    let c = client();
    assert!(!c.is_trusted("https://raw.githubusercontent.com.evil.example/o/r/main/x"));
    assert!(!c.is_trusted("https://api.github.com.evil.example/repos"));
    assert!(!c.is_trusted("http://api.github.com/repos"));
    assert!(!c.is_trusted("https://api.github.com:8443/repos"));
    assert!(!c.is_trusted("https://github.com/o/r/blob/main/README.md"));
    assert!(!c.is_trusted("not a url"));
}

#[test]
fn token_only_goes_to_trusted_hosts() {
    let cfg = GalleryConfig {
        token: Some("secret".to_string()),
        ..GalleryConfig::default()
    };
    let c = ContentClient::new(Arc::new(cfg)).expect("client");
    let has_auth = |url: &str| {
        c.get(url)
            .build()
            .expect("request")
            .headers()
            .contains_key(reqwest::header::AUTHORIZATION)
    };
    assert!(has_auth("https://api.github.com/repos/o/r/commits"));
    assert!(!has_auth("https://raw.githubusercontent.com.evil.example/x"));
}
