//! Tests for Network Adapters

use super::*;
use crate::domain::{InterfaceId, ProxyConfig};
use crate::ports::{ConfigProvider, TimeSource};

#[test]
fn test_system_time_source_reads_unix_seconds() {
    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let now = SystemTimeSource::new().now().as_secs();
    assert!(now >= before && now - before <= 1);
}

#[test]
fn test_fresh_stamp_has_zero_age() {
    let clock = SystemTimeSource::new();
    let stamped = clock.now();
    let ages: Vec<u64> = (0..100).map(|_| clock.now().secs_since(stamped)).collect();
    assert!(ages.windows(2).all(|w| w[0] <= w[1]));
    assert!(ages[99] <= 1);
}

#[test]
fn test_static_config_provider_defaults() {
    let provider = StaticConfigProvider::new();
    assert_eq!(provider.bind_addr(), "[::]:5683".parse().unwrap());
    assert_eq!(provider.proxy_config(), ProxyConfig::default());
    assert!(provider.interfaces().is_empty());
}

#[test]
fn test_static_config_provider_builders() {
    let provider = StaticConfigProvider::new()
        .with_bind_addr("127.0.0.1:6000".parse().unwrap())
        .with_config(ProxyConfig::for_testing())
        .with_interfaces(vec![InterfaceId::new(1)]);
    assert_eq!(provider.bind_addr().port(), 6000);
    assert_eq!(provider.proxy_config().waiter_timeout_secs, 5);
    assert_eq!(provider.interfaces(), vec![InterfaceId::new(1)]);
}

#[cfg(feature = "network")]
mod toml_tests {
    use super::*;

    #[test]
    fn test_full_file() {
        let provider = TomlConfigProvider::parse(
            r#"
            bind_addr = "[::1]:5700"
            interfaces = [6, 7]

            [proxy]
            waiter_timeout_secs = 30
            memo_lifetime_secs = 40
            sweep_interval_secs = 2
            "#,
        )
        .unwrap();

        assert_eq!(provider.bind_addr(), "[::1]:5700".parse().unwrap());
        assert_eq!(
            provider.interfaces(),
            vec![InterfaceId::new(6), InterfaceId::new(7)]
        );
        let config = provider.proxy_config();
        assert_eq!(config.waiter_timeout_secs, 30);
        assert_eq!(config.memo_lifetime_secs, 40);
        assert_eq!(config.sweep_interval_secs, 2);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let provider = TomlConfigProvider::parse("").unwrap();
        assert_eq!(provider.bind_addr(), "[::]:5683".parse().unwrap());
        assert_eq!(provider.proxy_config(), ProxyConfig::default());
    }

    #[test]
    fn test_invalid_bind_addr() {
        assert_eq!(
            TomlConfigProvider::parse(r#"bind_addr = "localhost""#).unwrap_err(),
            ConfigError::InvalidBindAddr("localhost".into())
        );
    }

    #[test]
    fn test_zero_duration_rejected() {
        assert_eq!(
            TomlConfigProvider::parse("[proxy]\nsweep_interval_secs = 0").unwrap_err(),
            ConfigError::ZeroDuration("sweep_interval_secs")
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(matches!(
            TomlConfigProvider::parse("bogus = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proxy.toml");
        std::fs::write(&path, "interfaces = [3]\n").unwrap();

        let provider = TomlConfigProvider::load(&path).unwrap();
        assert_eq!(provider.interfaces(), vec![InterfaceId::new(3)]);

        let missing = TomlConfigProvider::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}

#[cfg(feature = "network")]
mod udp_tests {
    use super::*;
    use crate::domain::Endpoint;
    use crate::ports::Transport;

    #[tokio::test]
    async fn test_udp_transport_delivers_datagram() {
        let sender = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let receiver = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let target = Endpoint::from(receiver.local_addr().unwrap());

        sender.clone().send_to(&[0x40, 0x01, 0x00, 0x01], &target).unwrap();

        let mut buf = [0u8; 16];
        let (len, from) = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            receiver.socket().recv_from(&mut buf),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(&buf[..len], &[0x40, 0x01, 0x00, 0x01]);
        assert_eq!(from, sender.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_send_immediately_after_bind_succeeds() {
        let transport = UdpTransport::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let own = Endpoint::from(transport.local_addr().unwrap());

        // No await between bind and send.
        assert_eq!(transport.send_to(b"\x50\x01\x00\x02", &own), Ok(()));

        let mut buf = [0u8; 16];
        let (len, from) = tokio::time::timeout(
            std::time::Duration::from_secs(2),
            transport.socket().recv_from(&mut buf),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(&buf[..len], b"\x50\x01\x00\x02");
        assert_eq!(from, transport.local_addr().unwrap());
    }

    #[tokio::test]
    async fn test_from_std_shares_one_socket() {
        let std_socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = std_socket.local_addr().unwrap();

        let transport = UdpTransport::from_std(std_socket).unwrap();
        assert_eq!(transport.local_addr().unwrap(), addr);
        assert_eq!(transport.socket().local_addr().unwrap(), addr);
    }
}
