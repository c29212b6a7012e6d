use component_macros::ComponentTraits;
use infrastructure_common::{ComponentId, ComponentTraits};

#[derive(ComponentTraits)]
#[component(uuid = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d", description = "ok")]
struct OkComponent;

fn main() {
    assert_eq!(OkComponent::ID, ComponentId::from_u128(0xa1b2c3d4_e5f6_4a7b_8c9d_0e1f2a3b4c5d));
    assert_eq!(OkComponent::NAME, "OkComponent");
    assert_eq!(OkComponent::DESCRIPTION, "ok");
    let _ = OkComponent;
}
