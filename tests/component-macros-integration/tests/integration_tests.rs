//! Centralized integration tests for component-macros

use component_macros::{interface, ComponentTraits};
use infrastructure_common::{
    Component, ComponentBase, ComponentId, ComponentIntrospect, ComponentRef, ComponentResult,
    ComponentTraits, InterfaceId, InterfaceTraits,
};

#[interface(
    uuid = "6d1c0f3a-2b4e-4c5d-8e9f-0a1b2c3d4e5f",
    name = "Lorn::IStorage",
    description = "键值存储"
)]
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

#[interface(uuid = "b7e8f9a0-1c2d-4e3f-8a5b-6c7d8e9f0a1b")]
pub trait Flushable: Send + Sync {
    fn flush(&self) -> usize;
}

#[derive(ComponentTraits)]
#[component(uuid = "4a5b6c7d-8e9f-4a0b-9c1d-2e3f4a5b6c7d", name = "MemoryStorage")]
struct MemoryStorage {
    base: ComponentBase,
}

impl Component for MemoryStorage {
    fn create(instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>().with_instance_name(instance_name);
        base.add_interface::<dyn Storage, Self>(|c| c)
            .add_interface::<dyn Flushable, Self>(|c| c);
        Ok(Self { base })
    }
}

impl ComponentIntrospect for MemoryStorage {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        (key == "answer").then(|| "42".to_string())
    }
}

impl Flushable for MemoryStorage {
    fn flush(&self) -> usize {
        0
    }
}

#[test]
fn test_interface_attribute_generates_traits() {
    assert_eq!(
        <dyn Storage>::ID,
        InterfaceId::from_u128(0x6d1c0f3a_2b4e_4c5d_8e9f_0a1b2c3d4e5f)
    );
    assert_eq!(<dyn Storage>::NAME, "Lorn::IStorage");
    assert_eq!(<dyn Storage>::DESCRIPTION, "键值存储");

    assert_eq!(<dyn Flushable>::NAME, "Flushable");
    assert_eq!(<dyn Flushable>::DESCRIPTION, "");
}

#[test]
fn test_interface_metadata_uses_generated_constants() {
    let metadata = <dyn Storage>::metadata();
    assert_eq!(metadata.id(), <dyn Storage>::ID);
    assert_eq!(metadata.name(), "Lorn::IStorage");
}

#[test]
fn test_component_derive_generates_traits() {
    assert_eq!(
        MemoryStorage::ID,
        ComponentId::from_u128(0x4a5b6c7d_8e9f_4a0b_9c1d_2e3f4a5b6c7d)
    );
    assert_eq!(MemoryStorage::NAME, "MemoryStorage");
    assert_eq!(MemoryStorage::DESCRIPTION, "");
}

#[test]
fn test_generated_identities_drive_interface_queries() {
    let component = ComponentRef::from_component(MemoryStorage::create(None).unwrap());

    assert_eq!(component.component_id(), MemoryStorage::ID);
    assert!(component.implements(&<dyn Storage>::ID));
    assert!(component.implements(&<dyn Flushable>::ID));
    assert!(component.implements(&<dyn ComponentIntrospect>::ID));

    let storage = component.bind_to::<dyn Storage>().unwrap();
    assert_eq!(storage.get("answer").as_deref(), Some("42"));
    assert_eq!(component.bind_to::<dyn Flushable>().unwrap().flush(), 0);
}
