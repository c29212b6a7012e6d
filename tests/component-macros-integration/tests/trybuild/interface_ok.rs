use component_macros::interface;
use infrastructure_common::{InterfaceId, InterfaceTraits};

#[interface(uuid = "3f2a6c1e-8b4d-4e7f-9a0b-1c2d3e4f5a6b")]
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

fn main() {
    assert_eq!(
        <dyn Clock as InterfaceTraits>::ID,
        InterfaceId::from_u128(0x3f2a6c1e_8b4d_4e7f_9a0b_1c2d3e4f5a6b)
    );
    assert_eq!(<dyn Clock as InterfaceTraits>::NAME, "Clock");
}
