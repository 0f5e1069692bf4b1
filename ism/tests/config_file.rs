use std::io::Write;
use std::sync::Arc;

use oism_crypto::derive_address;
use oism_ism::{IsmConfig, IsmError, OptimisticIsm, RouteConfig};
use oism_modules::DelegateDirectory;
use oism_nullables::{NullClock, NullDelegate};

fn sample_config() -> IsmConfig {
    let mut config = IsmConfig::new(
        derive_address("owner"),
        vec![derive_address("watcher-a"), derive_address("watcher-b")],
        2,
    );
    config.fraud_window_secs = 60;
    config.routes.push(RouteConfig {
        origin: 5,
        delegate: derive_address("delegate-s"),
    });
    config
}

#[test]
fn module_built_from_a_config_file() {
    let config = sample_config();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(config.to_toml_string().unwrap().as_bytes())
        .unwrap();

    let loaded = IsmConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(loaded, config);

    let directory = Arc::new(DelegateDirectory::new());
    directory.register(derive_address("delegate-s"), Arc::new(NullDelegate::accepting()));
    let ism = OptimisticIsm::from_config(&loaded, directory, Arc::new(NullClock::new(10))).unwrap();

    assert_eq!(ism.fraud_window(), 60);
    assert_eq!(ism.route(5), Some(derive_address("delegate-s")));
    assert_eq!(ism.watchers_and_threshold().unwrap().threshold, 2);
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = IsmConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    match err {
        IsmError::Config(msg) => assert!(msg.contains("absent.toml"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn invalid_values_in_file_are_rejected_at_build() {
    let mut config = sample_config();
    config.threshold = 3;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ism.toml");
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    let loaded = IsmConfig::from_toml_file(&path).unwrap();
    assert!(matches!(
        OptimisticIsm::from_config(
            &loaded,
            Arc::new(DelegateDirectory::new()),
            Arc::new(NullClock::new(10)),
        ),
        Err(IsmError::WatcherSet(_))
    ));
}
