use crate::fixtures;
use lumen_core::domain::asset::{resolve_deposit_asset, AssetKey, Leg, Route};
use lumen_core::AnchorError;

#[test]
fn test_resolve_when_from_native_to_issued_then_credits_issued() {
    let leg = fixtures::anchor_leg();
    let asset = resolve_deposit_asset(Some(&leg), &fixtures::direct_route()).expect("resolve");
    assert_eq!(asset.code, "SRT");
    assert_eq!(asset.issuer.as_deref(), Some(fixtures::SRT_ISSUER));
    assert!(!asset.is_native);
}

#[test]
fn test_resolve_when_from_issued_to_native_then_credits_native() {
    let leg = Leg { from: fixtures::srt(), to: fixtures::native_xlm() };
    let route = Route::new(vec![fixtures::srt(), fixtures::native_xlm()]);
    let asset = resolve_deposit_asset(Some(&leg), &route).expect("resolve");
    assert_eq!(asset.code, "XLM");
    assert!(asset.is_native);
    assert!(asset.issuer.is_none());
}

#[test]
fn test_resolve_when_both_issued_then_defaults_to_destination() {
    let usdc = AssetKey::issued("USDC", "GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN");
    let leg = Leg { from: fixtures::srt(), to: usdc.clone() };
    let route = Route::new(vec![fixtures::srt(), usdc]);
    let asset = resolve_deposit_asset(Some(&leg), &route).expect("resolve");
    assert_eq!(asset.code, "USDC");
    assert!(!asset.is_native);
}

#[test]
fn test_resolve_when_no_leg_then_falls_back_to_route_destination() {
    let route = Route::new(vec![fixtures::native_xlm(), fixtures::srt()]);
    let asset = resolve_deposit_asset(None, &route).expect("resolve");
    assert_eq!(asset.code, "SRT");
}

#[test]
fn test_resolve_when_no_leg_and_empty_route_then_undeterminable() {
    let err = resolve_deposit_asset(None, &Route::default()).unwrap_err();
    assert!(matches!(err, AnchorError::AssetUndeterminable(_)));
}

#[test]
fn test_route_native_detection() {
    assert!(fixtures::direct_route().passes_through_native());
    let issued_only = Route::new(vec![fixtures::srt()]);
    assert!(!issued_only.passes_through_native());
}
