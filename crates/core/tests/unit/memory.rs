//! Data Memory Tests.

use dlx_core::core::memory::DataMemory;

#[test]
fn memory_starts_filled_with_ff() {
    let mem = DataMemory::new(16, 0);
    assert_eq!(mem.size(), 16);
    for i in 0..16 {
        assert_eq!(mem.read_byte(i), 0xFF);
    }
    assert_eq!(mem.read_word(0), 0xFFFF_FFFF);
}

#[test]
fn word_round_trip() {
    let mut mem = DataMemory::new(32, 0);
    mem.write_word(4, 0xDEAD_BEEF);
    assert_eq!(mem.read_word(4), 0xDEAD_BEEF);
}

#[test]
fn words_are_little_endian() {
    let mut mem = DataMemory::new(8, 0);
    mem.write_word(0, 0x1122_3344);
    assert_eq!(mem.read_byte(0), 0x44);
    assert_eq!(mem.read_byte(1), 0x33);
    assert_eq!(mem.read_byte(2), 0x22);
    assert_eq!(mem.read_byte(3), 0x11);
}

#[test]
fn reset_refills_with_ff() {
    let mut mem = DataMemory::new(8, 3);
    mem.write_word(0, 0);
    mem.reset();
    assert_eq!(mem.read_word(0), 0xFFFF_FFFF);
    assert_eq!(mem.latency(), 3, "latency survives reset");
}
