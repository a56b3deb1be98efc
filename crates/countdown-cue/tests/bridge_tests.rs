//! Integration tests for the host-facing surface.

use countdown_cue::{
    ErrorCode, Fault, HostCall, HostReply, MemoryBackend, ResourceState, SoundAsset, SoundConfig,
    SoundModule,
};

fn module() -> (SoundModule<MemoryBackend>, countdown_cue::MemoryProbe) {
    let backend = MemoryBackend::new();
    let probe = backend.probe();
    (SoundModule::new(backend, SoundConfig::default()), probe)
}

#[test]
fn test_scenario_through_bridge() {
    let (mut module, _probe) = module();

    assert_eq!(module.set_volume(1.5), Ok(true));
    assert_eq!(module.controller().volume(), 1.0);
    assert_eq!(module.set_volume(-0.2), Ok(true));
    assert_eq!(module.controller().volume(), 0.0);

    assert_eq!(module.play(), Ok(true));
    assert_eq!(module.stop(), Ok(true));

    module.teardown();
    assert!(!module.controller().has_resource());
    assert_eq!(module.state(), ResourceState::Released);
}

#[test]
fn test_play_without_asset_rejects_player_null() {
    let asset = SoundAsset::from_bytes("countdown_321", Vec::new());
    let mut module = SoundModule::with_asset(MemoryBackend::new(), asset, SoundConfig::default());

    let rejection = module.play().unwrap_err();
    assert_eq!(rejection.code, ErrorCode::PlayerNull);
    assert_eq!(rejection.message, "player not initialized");
}

#[test]
fn test_play_fault_rejects_play_error() {
    let (mut module, probe) = module();
    probe.inject(Fault::Start);
    assert_eq!(module.play().unwrap_err().code, ErrorCode::PlayError);
}

#[test]
fn test_volume_fault_rejects_volume_error() {
    let (mut module, probe) = module();
    module.play().unwrap();
    probe.inject(Fault::Volume);
    assert_eq!(module.set_volume(0.5).unwrap_err().code, ErrorCode::VolumeError);
}

#[test]
fn test_nan_volume_rejects_volume_error() {
    let (mut module, _probe) = module();
    assert_eq!(module.set_volume(f64::NAN).unwrap_err().code, ErrorCode::VolumeError);
    assert_eq!(module.controller().volume(), 0.7);
}

#[test]
fn test_stop_fault_rejects_stop_error() {
    let (mut module, probe) = module();
    module.play().unwrap();
    probe.inject(Fault::Halt);
    assert_eq!(module.stop().unwrap_err().code, ErrorCode::StopError);
}

#[test]
fn test_stop_before_anything_resolves_true() {
    let (mut module, probe) = module();
    assert_eq!(module.stop(), Ok(true));
    assert_eq!(probe.voices_opened(), 0);
}

#[test]
fn test_disabled_config_resolves_false() {
    let backend = MemoryBackend::new();
    let probe = backend.probe();
    let mut module = SoundModule::new(backend, SoundConfig::new().with_enabled(false));

    assert_eq!(module.play(), Ok(false));
    assert_eq!(probe.voices_opened(), 0);
}

#[test]
fn test_invoke_dispatches_calls() {
    let (mut module, _probe) = module();
    assert_eq!(module.invoke(HostCall::SetVolume { volume: 0.4 }), Ok(true));
    assert_eq!(module.invoke(HostCall::Play), Ok(true));
    assert_eq!(module.state(), ResourceState::Playing);
    assert_eq!(module.invoke(HostCall::Stop), Ok(true));
    assert_eq!(module.state(), ResourceState::Ready);
}

#[test]
fn test_json_round_trip() {
    let (mut module, _probe) = module();

    let reply = module.handle_json(r#"{"method":"play"}"#).unwrap();
    assert_eq!(reply, r#"{"ok":true,"value":true}"#);

    let reply = module.handle_json(r#"{"method":"stop"}"#).unwrap();
    assert_eq!(reply, r#"{"ok":true,"value":true}"#);
}

#[test]
fn test_json_rejection_reply() {
    let asset = SoundAsset::from_bytes("countdown_321", Vec::new());
    let mut module = SoundModule::with_asset(MemoryBackend::new(), asset, SoundConfig::default());

    let reply = module.handle_json(r#"{"method":"play"}"#).unwrap();
    let reply: HostReply = serde_json::from_str(&reply).unwrap();
    assert!(!reply.ok);
    assert_eq!(reply.code, Some(ErrorCode::PlayerNull));
    assert_eq!(reply.message.as_deref(), Some("player not initialized"));
}

#[test]
fn test_malformed_json_is_an_error() {
    let (mut module, probe) = module();
    assert!(module.handle_json("{not json").is_err());
    assert!(module.handle_json(r#"{"method":"setVolume"}"#).is_err());
    assert_eq!(probe.voices_opened(), 0);
}

#[test]
fn test_preload_config_builds_resource_at_construction() {
    let backend = MemoryBackend::new();
    let probe = backend.probe();
    let module = SoundModule::new(backend, SoundConfig::new().with_preload(true));

    assert_eq!(module.state(), ResourceState::Ready);
    assert_eq!(probe.voices_opened(), 1);
}

#[test]
fn test_drop_releases_resource() {
    let (mut module, probe) = module();
    module.play().unwrap();
    drop(module);
    assert!(probe
        .events()
        .iter()
        .any(|e| matches!(e, countdown_cue::VoiceEvent::Released { voice: 0 })));
}
