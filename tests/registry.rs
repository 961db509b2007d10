mod support;

mod tests {
    use myrtio_strip_controller::color::{BLACK, Hsv, HsvChannel, Rgb, RgbChannel};
    use myrtio_strip_controller::{
        DefaultColorError, DefaultColorStore, DeviceId, DeviceRegistry, MemoryStorage,
        RegistryError,
    };

    use super::support::{FailingStorage, RecordingDriver};

    type Registry = DeviceRegistry<RecordingDriver, 2, 8>;
    type Store = DefaultColorStore<MemoryStorage<16>>;

    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const FIRST: DeviceId = DeviceId::new(0);
    const SECOND: DeviceId = DeviceId::new(1);

    fn setup(storage: MemoryStorage<16>) -> (Registry, Store) {
        let mut registry = Registry::new();
        let mut store = DefaultColorStore::new(storage);
        registry
            .register(RecordingDriver::default(), 3, None, &mut store)
            .unwrap();
        registry
            .register(RecordingDriver::default(), 5, Some("desk"), &mut store)
            .unwrap();
        (registry, store)
    }

    fn assert_blending_invariant(registry: &Registry) {
        for device in registry.iter() {
            assert_eq!(
                device.is_blending(),
                device.current_color() != device.target_color()
            );
        }
    }

    #[test]
    fn test_register_renders_black() {
        let (registry, _) = setup(MemoryStorage::new());
        assert_eq!(registry.len(), 2);

        let device = registry.get(SECOND).unwrap();
        assert_eq!(device.id(), SECOND);
        assert_eq!(device.name(), Some("desk"));
        assert_eq!(device.leds(), 5);
        assert_eq!(device.driver().frames, vec![vec![BLACK; 5]]);
        assert!(!device.is_enabled());
        assert!(!device.is_blending());
        assert_eq!(device.current_color(), BLACK);
    }

    #[test]
    fn test_register_failures() {
        let mut registry = DeviceRegistry::<RecordingDriver, 1, 8>::new();
        let mut store = DefaultColorStore::new(MemoryStorage::<16>::new());

        let too_long = registry.register(RecordingDriver::default(), 9, None, &mut store);
        assert_eq!(too_long, Err(RegistryError::TooManyLeds));

        let name = registry.register(
            RecordingDriver::default(),
            1,
            Some("a-very-long-device-name"),
            &mut store,
        );
        assert_eq!(name, Err(RegistryError::NameTooLong));

        let first = registry.register(RecordingDriver::default(), 8, None, &mut store);
        assert_eq!(first, Ok(FIRST));
        let full = registry.register(RecordingDriver::default(), 1, None, &mut store);
        assert_eq!(full, Err(RegistryError::Full));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_default_color_loaded_on_register() {
        let mut bytes = [0; 16];
        bytes[3..6].copy_from_slice(&[10, 20, 30]);
        let (registry, _) = setup(MemoryStorage::from_bytes(bytes));

        assert_eq!(registry.get(FIRST).unwrap().default_color(), Hsv::new(0, 0, 0));
        assert_eq!(registry.get(SECOND).unwrap().default_color(), Hsv::new(10, 20, 30));
    }

    #[test]
    fn test_unreadable_default_color_falls_back_to_black() {
        let mut registry = Registry::new();
        let mut store = DefaultColorStore::new(FailingStorage);
        let id = registry
            .register(RecordingDriver::default(), 2, None, &mut store)
            .unwrap();
        assert_eq!(registry.get(id).unwrap().default_color(), Hsv::default());

        let mut registry = Registry::new();
        let mut store = DefaultColorStore::new(MemoryStorage::<4>::new());
        registry
            .register(RecordingDriver::default(), 2, None, &mut store)
            .unwrap();
        let id = registry
            .register(RecordingDriver::default(), 2, None, &mut store)
            .unwrap();
        assert_eq!(registry.get(id).unwrap().default_color(), Hsv::default());
    }

    #[test]
    fn test_resolve_selector() {
        let (registry, _) = setup(MemoryStorage::new());
        assert_eq!(registry.resolve("0"), Some(FIRST));
        assert_eq!(registry.resolve("1"), Some(SECOND));
        assert_eq!(registry.resolve("desk"), Some(SECOND));
        assert_eq!(registry.resolve("7"), None);
        assert_eq!(registry.resolve("lamp"), None);
        assert_eq!(registry.find("desk"), Some(SECOND));
    }

    #[test]
    fn test_resolve_numeric_name() {
        let mut registry = Registry::new();
        let mut store = DefaultColorStore::new(MemoryStorage::<16>::new());
        registry
            .register(RecordingDriver::default(), 3, Some("1"), &mut store)
            .unwrap();
        let named = registry
            .register(RecordingDriver::default(), 3, Some("7"), &mut store)
            .unwrap();

        assert_eq!(registry.resolve("7"), Some(named));
        assert_eq!(registry.resolve("1"), Some(SECOND));
        assert_eq!(registry.resolve("0"), Some(FIRST));
        assert_eq!(registry.resolve("9"), None);
    }

    #[test]
    fn test_enable_with_black_target_uses_default() {
        let mut bytes = [0; 16];
        bytes[0..3].copy_from_slice(&[0, 255, 255]);
        let (mut registry, _) = setup(MemoryStorage::from_bytes(bytes));

        registry.enable(FIRST).unwrap();
        let device = registry.get(FIRST).unwrap();
        assert!(device.is_enabled());
        assert_eq!(device.target_hsv(), Hsv::new(0, 255, 255));
        assert_eq!(device.target_color(), RED);
        assert!(device.is_blending());
        assert!(registry.take_blend_request());
        assert!(!registry.take_blend_request());
        assert_blending_invariant(&registry);
    }

    #[test]
    fn test_enable_is_noop_when_enabled() {
        let (mut registry, _) = setup(MemoryStorage::new());
        registry.set_color(FIRST, Hsv::new(0, 255, 255)).unwrap();
        registry.take_blend_request();

        registry.enable(FIRST).unwrap();
        assert!(!registry.take_blend_request());
    }

    #[test]
    fn test_disable_keeps_logical_target() {
        let (mut registry, _) = setup(MemoryStorage::new());
        registry.set_color(FIRST, Hsv::new(0, 255, 255)).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());

        registry.disable(FIRST).unwrap();
        let device = registry.get(FIRST).unwrap();
        assert!(!device.is_enabled());
        assert_eq!(device.target_color(), BLACK);
        assert_eq!(device.target_rgb(), RED);
        assert_eq!(device.target_hsv(), Hsv::new(0, 255, 255));
        assert_blending_invariant(&registry);

        registry.enable(FIRST).unwrap();
        assert_eq!(registry.get(FIRST).unwrap().target_color(), RED);
    }

    #[test]
    fn test_toggle_and_set_enable() {
        let (mut registry, _) = setup(MemoryStorage::new());

        registry.toggle(FIRST).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());
        registry.toggle(FIRST).unwrap();
        assert!(!registry.get(FIRST).unwrap().is_enabled());

        registry.set_enable(FIRST, 1).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());
        registry.set_enable(FIRST, 1).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());
        registry.set_enable(FIRST, 0).unwrap();
        assert!(!registry.get(FIRST).unwrap().is_enabled());
        registry.set_enable(FIRST, 7).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());
        registry.set_enable(FIRST, 2).unwrap();
        assert!(!registry.get(FIRST).unwrap().is_enabled());
    }

    #[test]
    fn test_auto_enable_from_hsv() {
        let (mut registry, _) = setup(MemoryStorage::new());

        registry.set_param_hsv(FIRST, HsvChannel::Value, 200).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());
        assert_blending_invariant(&registry);

        registry.set_param_hsv(FIRST, HsvChannel::Hue, 40).unwrap();
        assert!(registry.get(FIRST).unwrap().is_enabled());

        registry.set_param_hsv(FIRST, HsvChannel::Value, 0).unwrap();
        let device = registry.get(FIRST).unwrap();
        assert!(!device.is_enabled());
        assert_eq!(device.target_hsv(), Hsv::new(40, 0, 0));
        assert_blending_invariant(&registry);
    }

    #[test]
    fn test_auto_enable_from_rgb() {
        let (mut registry, _) = setup(MemoryStorage::new());

        registry.set_param_rgb(SECOND, RgbChannel::Green, 10).unwrap();
        let device = registry.get(SECOND).unwrap();
        assert!(device.is_enabled());
        assert_eq!(device.target_rgb(), Rgb::new(0, 10, 0));
        assert_eq!(device.target_hsv().val, 10);

        registry.set_param_rgb(SECOND, RgbChannel::Green, 0).unwrap();
        assert!(!registry.get(SECOND).unwrap().is_enabled());
        assert_blending_invariant(&registry);
    }

    #[test]
    fn test_rgb_then_hsv_write_keeps_color() {
        let (mut registry, _) = setup(MemoryStorage::new());
        let blue = Rgb::new(0, 0, 255);

        registry.set_param_rgb(FIRST, RgbChannel::Blue, 255).unwrap();
        assert_eq!(registry.get(FIRST).unwrap().target_hsv(), Hsv::new(170, 255, 255));

        registry.set_param_hsv(FIRST, HsvChannel::Saturation, 255).unwrap();
        assert_eq!(registry.get(FIRST).unwrap().target_rgb(), blue);
        assert_eq!(registry.get(FIRST).unwrap().target_color(), blue);
    }

    #[test]
    fn test_set_color_with_zero_value_disables() {
        let (mut registry, _) = setup(MemoryStorage::new());
        registry.set_color(FIRST, Hsv::new(0, 255, 255)).unwrap();
        registry.set_color(FIRST, Hsv::new(90, 255, 0)).unwrap();
        assert!(!registry.get(FIRST).unwrap().is_enabled());
    }

    #[test]
    fn test_unknown_device() {
        let (mut registry, mut store) = setup(MemoryStorage::new());
        let missing = DeviceId::new(5);
        assert_eq!(registry.enable(missing), Err(RegistryError::UnknownDevice));
        assert_eq!(
            registry.set_color(missing, Hsv::new(1, 2, 3)),
            Err(RegistryError::UnknownDevice)
        );
        assert_eq!(
            registry.write_default_color(missing, Hsv::new(1, 2, 3), &mut store),
            Err(DefaultColorError::Registry(RegistryError::UnknownDevice))
        );
        assert!(!registry.take_blend_request());
    }

    #[test]
    fn test_default_color_round_trip() {
        let (mut registry, mut store) = setup(MemoryStorage::new());
        let color = Hsv::new(0x10, 0x20, 0x30);

        registry.write_default_color(SECOND, color, &mut store).unwrap();
        assert_eq!(registry.get(SECOND).unwrap().default_color(), color);
        assert_eq!(&store.storage().as_bytes()[3..6], &[0x10, 0x20, 0x30]);
        assert_eq!(&store.storage().as_bytes()[0..3], &[0, 0, 0]);
        assert_eq!(registry.read_default_color(SECOND, &mut store), Ok(color));
    }

    #[test]
    fn test_failed_default_write_keeps_old_default() {
        let mut registry = Registry::new();
        let mut store = DefaultColorStore::new(FailingStorage);
        let id = registry
            .register(RecordingDriver::default(), 2, None, &mut store)
            .unwrap();

        let result = registry.write_default_color(id, Hsv::new(1, 2, 3), &mut store);
        assert!(matches!(result, Err(DefaultColorError::Storage(_))));
        assert_eq!(registry.get(id).unwrap().default_color(), Hsv::default());
    }

    #[test]
    fn test_write_summary() {
        let (mut registry, _) = setup(MemoryStorage::new());
        registry.set_color(SECOND, Hsv::new(0, 255, 255)).unwrap();

        let mut summary = String::new();
        registry.write_summary(&mut summary).unwrap();
        assert_eq!(
            summary,
            "2 devices registered\n\
             00: disabled RGB: (000,000,000)\n\
             01: enabled  RGB: (255,000,000)\n"
        );
    }

    #[test]
    fn test_show_renders_current_color() {
        let (mut registry, _) = setup(MemoryStorage::new());
        registry.show(FIRST).unwrap();
        let driver = registry.get(FIRST).unwrap().driver();
        assert_eq!(driver.frames.len(), 2);
        assert_eq!(driver.last_frame(), Some(&[BLACK; 3][..]));
    }
}
