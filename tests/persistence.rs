mod tests {
    use embedded_storage::{ReadStorage, Storage};
    use myrtio_strip_controller::color::Hsv;
    use myrtio_strip_controller::persistence::RECORD_LEN;
    use myrtio_strip_controller::{DefaultColorStore, DeviceId, MemoryStorage, StorageError};

    #[test]
    fn test_record_offsets() {
        type Store = DefaultColorStore<MemoryStorage<12>>;
        assert_eq!(RECORD_LEN, 3);
        assert_eq!(Store::offset(DeviceId::new(0)), 0);
        assert_eq!(Store::offset(DeviceId::new(1)), 3);
        assert_eq!(Store::offset(DeviceId::new(3)), 9);
    }

    #[test]
    fn test_round_trip() {
        let mut store = DefaultColorStore::new(MemoryStorage::<12>::new());
        let colors = [
            Hsv::new(0, 0, 0),
            Hsv::new(255, 255, 255),
            Hsv::new(1, 128, 254),
            Hsv::new(171, 3, 90),
        ];
        for (index, color) in (0u8..).zip(colors) {
            store.write(DeviceId::new(index), color).unwrap();
        }
        for (index, color) in (0u8..).zip(colors) {
            assert_eq!(store.read(DeviceId::new(index)), Ok(color));
        }
        assert_eq!(&store.storage().as_bytes()[6..9], &[1, 128, 254]);
    }

    #[test]
    fn test_records_do_not_overlap() {
        let mut store = DefaultColorStore::new(MemoryStorage::<6>::new());
        store.write(DeviceId::new(1), Hsv::new(9, 9, 9)).unwrap();
        assert_eq!(store.read(DeviceId::new(0)), Ok(Hsv::new(0, 0, 0)));
        assert_eq!(store.storage().as_bytes(), &[0, 0, 0, 9, 9, 9]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut store = DefaultColorStore::new(MemoryStorage::<5>::new());
        assert_eq!(store.read(DeviceId::new(1)), Err(StorageError::OutOfBounds));
        assert_eq!(
            store.write(DeviceId::new(1), Hsv::new(1, 2, 3)),
            Err(StorageError::OutOfBounds)
        );
        assert_eq!(store.storage().as_bytes(), &[0; 5]);
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::<4>::from_bytes([1, 2, 3, 4]);
        assert_eq!(storage.capacity(), 4);

        let mut bytes = [0; 2];
        storage.read(2, &mut bytes).unwrap();
        assert_eq!(bytes, [3, 4]);
        assert_eq!(storage.read(3, &mut bytes), Err(StorageError::OutOfBounds));

        storage.write(0, &[9]).unwrap();
        assert_eq!(storage.as_bytes(), &[9, 2, 3, 4]);
        assert_eq!(storage.write(4, &[1]), Err(StorageError::OutOfBounds));
    }
}
