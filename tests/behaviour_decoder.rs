//! BDD tests for decoding a single manifest container stream.

mod support;

use release_channel::{InvalidChannelData, ReleaseInfo, get_channel_from_stream};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use semver::Version;
use std::io::Cursor;
use support::containers::{SignedBy, manifest_json, signed_container, trusted_verifier, utf16le};

#[derive(Default)]
struct DecodeWorld {
    json: Option<String>,
    with_bom: bool,
    signed_by: SignedBy,
    result: Option<Result<ReleaseInfo, InvalidChannelData>>,
}

#[fixture]
fn world() -> DecodeWorld {
    DecodeWorld::default()
}

fn record(world: &DecodeWorld) -> &ReleaseInfo {
    match world.result.as_ref().expect("stream decoded") {
        Ok(info) => info,
        Err(err) => panic!("expected a record, got {err}"),
    }
}

#[given("a container with current version \"{current}\" and production minimum \"{minimum}\"")]
fn given_container(world: &mut DecodeWorld, current: String, minimum: String) {
    world.json = Some(manifest_json(&current, &minimum));
}

#[given("a manifest resource without a production minimum")]
fn given_missing_minimum(world: &mut DecodeWorld) {
    world.json = Some(r#"{"current-version":"2.0.0"}"#.to_owned());
}

#[given("an empty manifest resource")]
fn given_empty_resource(world: &mut DecodeWorld) {
    world.json = Some(String::new());
}

#[given("the resource has no byte-order mark")]
fn given_no_bom(world: &mut DecodeWorld) {
    world.with_bom = false;
}

#[given("the resource has a byte-order mark")]
fn given_bom(world: &mut DecodeWorld) {
    world.with_bom = true;
}

#[given("the container is signed by the publisher")]
fn given_publisher(world: &mut DecodeWorld) {
    world.signed_by = SignedBy::Publisher;
}

#[given("the container is signed by a stranger")]
fn given_stranger(world: &mut DecodeWorld) {
    world.signed_by = SignedBy::Stranger;
}

#[when("the stream is decoded")]
fn when_decoded(world: &mut DecodeWorld) {
    let json = world.json.as_deref().expect("manifest prepared");
    let resource = if json.is_empty() {
        Vec::new()
    } else {
        utf16le(json, world.with_bom)
    };
    let container = signed_container(&resource, world.signed_by);
    let verifier = trusted_verifier();
    world.result = Some(get_channel_from_stream(
        &mut Cursor::new(container),
        &verifier,
    ));
}

#[then("the record has current version \"{version}\"")]
fn then_current(world: &mut DecodeWorld, version: String) {
    let expected = Version::parse(&version).expect("valid version");
    assert_eq!(record(world).current_version(), &expected);
}

#[then("the record has production minimum \"{version}\"")]
fn then_minimum(world: &mut DecodeWorld, version: String) {
    let expected = Version::parse(&version).expect("valid version");
    assert_eq!(record(world).production_minimum_version(), &expected);
}

#[then("decoding fails with invalid channel data")]
fn then_invalid(world: &mut DecodeWorld) {
    let result = world.result.as_ref().expect("stream decoded");
    assert_eq!(result, &Err(InvalidChannelData));
}

#[scenario(
    path = "tests/features/manifest_decoding.feature",
    name = "Trusted container without a byte-order mark decodes"
)]
fn scenario_trusted_without_bom(world: DecodeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/manifest_decoding.feature",
    name = "Byte-order mark is stripped before parsing"
)]
fn scenario_bom_stripped(world: DecodeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/manifest_decoding.feature",
    name = "Untrusted container is rejected"
)]
fn scenario_untrusted(world: DecodeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/manifest_decoding.feature",
    name = "Manifest missing the production minimum is rejected"
)]
fn scenario_missing_minimum(world: DecodeWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/manifest_decoding.feature",
    name = "Empty resource is rejected"
)]
fn scenario_empty_resource(world: DecodeWorld) {
    let _ = world;
}
