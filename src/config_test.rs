use super::*;

fn lookup(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| (*v).to_owned())
}

#[test]
fn defaults_when_unset() {
    let config = HostConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, HostConfig::default());
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
}

#[test]
fn reads_port_and_bind_addr() {
    let config = HostConfig::from_lookup(lookup(&[("PORT", "8080"), ("BIND_ADDR", "127.0.0.1")])).unwrap();
    assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = HostConfig::from_lookup(lookup(&[("PORT", "  "), ("BIND_ADDR", "")])).unwrap();
    assert_eq!(config, HostConfig::default());
}

#[test]
fn values_are_trimmed() {
    let config = HostConfig::from_lookup(lookup(&[("PORT", " 4000 ")])).unwrap();
    assert_eq!(config.port, 4000);
}

#[test]
fn invalid_port_is_rejected() {
    let err = HostConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
    assert!(matches!(err, HostError::InvalidEnv { var: "PORT", .. }));
    assert_eq!(err.to_string(), "invalid PORT: \"http\"");
}

#[test]
fn invalid_bind_addr_is_rejected() {
    let err = HostConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")])).unwrap_err();
    assert!(matches!(err, HostError::InvalidEnv { var: "BIND_ADDR", .. }));
}
