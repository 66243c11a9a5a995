//! End-to-end scenarios through the public API only.

use microfiles::{
    io::{NullSink, SerialSink},
    path,
    ram::RamFilesystem,
    Files, FixedLayout,
};

type Fs = RamFilesystem<16, 512>;

#[derive(Default)]
struct Capture(Vec<u8>);

impl SerialSink for Capture {
    fn send(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }
}

#[test]
fn data_logger() {
    let mut files = Files::new(Fs::new(), Capture::default(), &FixedLayout::new(0x8000));

    files.create_directory("logs");
    files.append_line("logs/run.txt", Some("temp=21"));
    files.append_line("logs/run.txt", Some("temp=22"));
    files.append_line("logs/run.txt", None);
    files.read_to_serial("logs/run.txt");

    let (fs, serial) = files.into_inner();
    let expected = b"temp=21\r\ntemp=22\r\n\r\n";
    assert_eq!(fs.contents(path!("logs/run.txt")), Some(&expected[..]));
    assert_eq!(serial.0, expected);
}

#[test]
fn settings_survive_a_facade_rebuild() {
    let mut files = Files::new(Fs::new(), NullSink, &FixedLayout::new(0x8000));
    files.settings_save_number("brightness", 128);
    let (fs, sink) = files.into_inner();

    // a new facade over the same (already mounted) filesystem
    let mut files = Files::new(fs, sink, &FixedLayout::new(0x8000));
    assert_eq!(files.settings_read_number("brightness"), 128);
    let (fs, _) = files.into_inner();
    assert_eq!(fs.mount_count(), 1);
}

#[test]
fn mixed_workload() {
    let mut files = Files::new(Fs::new(), NullSink, &FixedLayout::new(0));

    files.append_string("a.txt", Some("hello"));
    files.append_number("a.txt", 5);
    files.settings_save_number("count", 2);
    files.remove("a.txt");
    files.append_buffer("a.txt", b"fresh");

    assert_eq!(files.read::<32>("a.txt").as_slice(), b"fresh");
    assert_eq!(files.settings_read_number("count"), 2);
}
