use std::io::Write;

use mocha_devices::{DeviceError, DeviceRegistry, Hsv, MemoryRegistry, PowerState, SimulatedLight};

#[tokio::test]
async fn memory_registry_tracks_state() {
    let registry = MemoryRegistry::new([
        SimulatedLight::new("10.0.0.1", "Bedroom Lamp"),
        SimulatedLight::new("10.0.0.2", "Kitchen Light"),
    ]);

    let devices = registry.list_devices().await.unwrap();
    assert_eq!(devices.len(), 2);
    assert_eq!(devices["10.0.0.2"], "Kitchen Light");

    registry.set_power("10.0.0.1", PowerState::On).await.unwrap();
    registry.set_brightness("10.0.0.1", 30).await.unwrap();
    registry
        .set_hsv("10.0.0.1", Hsv::new(200, 50, 100).unwrap())
        .await
        .unwrap();

    assert_eq!(registry.power_state("10.0.0.1").await.unwrap(), PowerState::On);
    let lamp = registry.light("10.0.0.1").unwrap();
    assert_eq!(lamp.brightness, 30);
    assert_eq!(lamp.color, Some(Hsv::new(200, 50, 100).unwrap()));
}

#[tokio::test]
async fn memory_registry_rejects_unknown_ids() {
    let registry = MemoryRegistry::default();
    let err = registry.set_power("nope", PowerState::On).await.unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(id) if id == "nope"));
}

#[tokio::test]
async fn loads_lights_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": "10.0.0.5", "name": "Porch", "on": true}}, {{"id": "10.0.0.6", "name": "Garage"}}]"#
    )
    .unwrap();

    let registry = MemoryRegistry::from_json_file(file.path()).unwrap();
    assert_eq!(registry.power_state("10.0.0.5").await.unwrap(), PowerState::On);
    let garage = registry.light("10.0.0.6").unwrap();
    assert!(!garage.on);
    assert_eq!(garage.brightness, 100);
}

#[test]
fn malformed_device_file_is_a_json_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();
    assert!(matches!(
        MemoryRegistry::from_json_file(file.path()),
        Err(DeviceError::Json(_))
    ));
}
