mod common;

use serde_json::json;

use common::{house, registry_for, FakeRegistry};
use mocha_agent::CorpusRefresh;
use mocha_devices::PowerState;

#[tokio::test]
async fn list_devices_renders_every_light() {
    let (_, tools) = registry_for(house(), CorpusRefresh::PerSearch);
    let out = tools.execute("list_devices", json!({})).await;
    assert_eq!(out, "10.0.0.1: Bedroom Lamp\n10.0.0.2: Kitchen Light");
}

#[tokio::test]
async fn list_devices_with_no_lights() {
    let (_, tools) = registry_for(FakeRegistry::with(&[]), CorpusRefresh::PerSearch);
    assert_eq!(tools.execute("list_devices", json!({})).await, "No devices found.");
}

#[tokio::test]
async fn search_devices_resolves_names() {
    let (_, tools) = registry_for(house(), CorpusRefresh::PerSearch);
    let out = tools
        .execute("search_devices", json!({"query": "bedroom"}))
        .await;
    assert_eq!(out, "10.0.0.1: Bedroom Lamp");
}

#[tokio::test]
async fn search_without_matches_returns_sentinel() {
    let (_, tools) = registry_for(house(), CorpusRefresh::PerSearch);
    let out = tools
        .execute("search_devices", json!({"query": "xyz123"}))
        .await;
    assert_eq!(out, "No matching devices found.");
}

#[tokio::test]
async fn per_search_refresh_sees_devices_added_later() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);
    devices.add("10.0.0.3", "Garage Light");

    let out = tools
        .execute("search_devices", json!({"query": "garage"}))
        .await;
    assert_eq!(out, "10.0.0.3: Garage Light");
}

#[tokio::test]
async fn snapshot_refresh_keeps_the_startup_corpus() {
    let devices = house();
    let (resolver, tools) = registry_for(devices.clone(), CorpusRefresh::Snapshot);

    let out = tools
        .execute("search_devices", json!({"query": "bedroom"}))
        .await;
    assert!(out.starts_with("Error running search_devices"), "{out}");

    let snapshot = {
        use mocha_devices::DeviceRegistry;
        devices.list_devices().await.unwrap()
    };
    resolver.write().await.set_devices(&snapshot);
    devices.add("10.0.0.3", "Garage Light");

    let out = tools
        .execute("search_devices", json!({"query": "garage"}))
        .await;
    assert_eq!(out, "No matching devices found.");
    let out = tools
        .execute("search_devices", json!({"query": "bedroom"}))
        .await;
    assert_eq!(out, "10.0.0.1: Bedroom Lamp");
}

#[tokio::test]
async fn power_light_on_unknown_identifier_reports_not_found() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);
    let out = tools
        .execute(
            "power_light",
            json!({"light": "10.0.0.99", "requested_status": "on"}),
        )
        .await;
    assert_eq!(out, "10.0.0.99 not found");
    assert!(devices.power_calls().is_empty());
}

#[tokio::test]
async fn power_light_twice_switches_once() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);
    let args = json!({"light": "10.0.0.1", "requested_status": "on"});

    let first = tools.execute("power_light", args.clone()).await;
    let second = tools.execute("power_light", args).await;

    assert_eq!(first, "Turned on light at 10.0.0.1");
    assert_eq!(second, "Light at 10.0.0.1 was already on");
    assert_eq!(
        devices.power_calls(),
        vec![("10.0.0.1".to_string(), PowerState::On)]
    );
}

#[tokio::test]
async fn missing_required_argument_is_reported_not_raised() {
    let (_, tools) = registry_for(house(), CorpusRefresh::PerSearch);
    let out = tools
        .execute("power_light", json!({"requested_status": "off"}))
        .await;
    assert!(out.starts_with("Invalid arguments for power_light:"), "{out}");
    assert!(out.contains("light"));
}

#[tokio::test]
async fn invalid_enum_value_is_reported() {
    let (_, tools) = registry_for(house(), CorpusRefresh::PerSearch);
    let out = tools
        .execute(
            "power_light",
            json!({"light": "10.0.0.1", "requested_status": "dim"}),
        )
        .await;
    assert!(out.starts_with("Invalid arguments for power_light:"), "{out}");
}

#[tokio::test]
async fn light_status_reads_live_state() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);
    assert_eq!(
        tools
            .execute("light_status", json!({"light": "10.0.0.2"}))
            .await,
        "10.0.0.2 is on"
    );
    devices.devices.lock().unwrap().get_mut("10.0.0.2").unwrap().1 = false;
    assert_eq!(
        tools
            .execute("light_status", json!({"light": "10.0.0.2"}))
            .await,
        "10.0.0.2 is off"
    );
}

#[tokio::test]
async fn brightness_and_hue_confirm_and_validate() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);

    let out = tools
        .execute(
            "adjust_brightness",
            json!({"light": "10.0.0.1", "brightness": 25}),
        )
        .await;
    assert_eq!(out, "Set brightness of 10.0.0.1 to 25%");

    let out = tools
        .execute(
            "adjust_brightness",
            json!({"light": "10.0.0.1", "brightness": 150}),
        )
        .await;
    assert!(out.starts_with("Invalid arguments for adjust_brightness"), "{out}");

    let out = tools
        .execute(
            "adjust_hue",
            json!({"light": "10.0.0.1", "hue": 200, "saturation": 50, "value": 100}),
        )
        .await;
    assert_eq!(out, "Set color of 10.0.0.1 to HSV(200, 50, 100)");

    let out = tools
        .execute(
            "adjust_hue",
            json!({"light": "10.0.0.1", "hue": 400, "saturation": 50, "value": 100}),
        )
        .await;
    assert!(out.starts_with("Invalid arguments for adjust_hue"), "{out}");

    assert_eq!(devices.brightness.lock().unwrap().len(), 1);
    assert_eq!(devices.colors.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn blink_effect_toggles_four_times_for_two_seconds() {
    let devices = house();
    let (_, tools) = registry_for(devices.clone(), CorpusRefresh::PerSearch);
    let started = tokio::time::Instant::now();

    let out = tools
        .execute("blink_effect", json!({"light": "10.0.0.1", "seconds": 2}))
        .await;

    assert_eq!(out, "Blinked 10.0.0.1 for 2 seconds");
    let states: Vec<PowerState> = devices.power_calls().into_iter().map(|(_, s)| s).collect();
    assert_eq!(
        states,
        vec![
            PowerState::On,
            PowerState::Off,
            PowerState::On,
            PowerState::Off
        ]
    );
    assert!(started.elapsed() >= std::time::Duration::from_secs(2));
    assert!(!devices.is_on("10.0.0.1"));
}
