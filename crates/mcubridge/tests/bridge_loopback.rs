#![cfg(all(unix, feature = "dispatch"))]

use std::io::Read;

use mcubridge::bus::BusLink;
use mcubridge::dispatch::{BoardConfig, Bridge, CMD_SET_DRIVE_MODE, CMD_WRITE_PIN};
use mcubridge::frame::{CommandFrame, ResponseWriter, GPIO_REGISTER};
use mcubridge::port::{DriveMode, PinId, PortRegisters};

fn read_response(host: &mut BusLink) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    host.read_exact(&mut bytes).expect("response should arrive");
    bytes
}

#[test]
fn full_grid_bridge_serves_gpio_traffic() {
    let board = BoardConfig::full_grid();
    let (regs, table) = board.build_table().expect("full grid should build");

    let (mut host, link) = BusLink::pair().expect("loopback pair");
    let mut bridge = Bridge::over_link(link, table).expect("bridge setup");
    let server = std::thread::spawn(move || bridge.serve().expect("serve should end cleanly"));

    let mut writer = ResponseWriter::new(host.try_clone().expect("clone host link"));

    // Drive P1[1] high: data bit 0 is the value, bits [1:3] the pin,
    // bits [4:7] the port.
    writer
        .send_frame(&CommandFrame::new(GPIO_REGISTER, CMD_WRITE_PIN, 0x0013))
        .expect("frame should send");
    assert_eq!(read_response(&mut host), [0x01, 0x00, 0x00, 0x00]);
    assert_eq!(regs.lock().unwrap().read_data(1), 0b0000_0010);

    // Same pin back low; sibling bits must be untouched throughout.
    writer
        .send_frame(&CommandFrame::new(GPIO_REGISTER, CMD_WRITE_PIN, 0x0012))
        .expect("frame should send");
    assert_eq!(read_response(&mut host), [0x00, 0x00, 0x00, 0x00]);
    assert_eq!(regs.lock().unwrap().read_data(1), 0);

    // Strong drive on P2[0]: mode nibble rides in data bits [8:11].
    let mode = u16::from(DriveMode::Strong.to_wire()) << 8;
    writer
        .send_frame(&CommandFrame::new(
            GPIO_REGISTER,
            CMD_SET_DRIVE_MODE,
            mode | 0x0020,
        ))
        .expect("frame should send");
    assert_eq!(
        read_response(&mut host),
        [DriveMode::Strong.to_wire(), 0x00, 0x00, 0x00]
    );
    assert_eq!(
        regs.lock().unwrap().drive_mode(PinId::new(2, 0)),
        Some(DriveMode::Strong)
    );

    drop(writer);
    drop(host);
    assert_eq!(server.join().unwrap(), 3);
}

#[test]
fn unassigned_address_echoes_and_session_continues() {
    let (regs, table) = BoardConfig::full_grid()
        .build_table()
        .expect("full grid should build");

    let (mut host, link) = BusLink::pair().expect("loopback pair");
    let mut bridge = Bridge::over_link(link, table).expect("bridge setup");
    let server = std::thread::spawn(move || bridge.serve().expect("serve should end cleanly"));

    let mut writer = ResponseWriter::new(host.try_clone().expect("clone host link"));

    // No peripheral lives at 0x42; the payload must come back unchanged.
    writer
        .send_frame(&CommandFrame::new(0x42, 0x01, 0xBEEF))
        .expect("frame should send");
    assert_eq!(read_response(&mut host), [0xEF, 0xBE, 0x00, 0x00]);

    // The dropped frame must not poison the next one.
    writer
        .send_frame(&CommandFrame::new(GPIO_REGISTER, CMD_WRITE_PIN, 0x0001))
        .expect("frame should send");
    assert_eq!(read_response(&mut host), [0x01, 0x00, 0x00, 0x00]);
    assert_eq!(regs.lock().unwrap().read_data(0), 0b0000_0001);

    drop(writer);
    drop(host);
    server.join().unwrap();
}

#[test]
fn reserved_addresses_are_serviced_as_no_ops() {
    let (_regs, table) = BoardConfig::full_grid()
        .build_table()
        .expect("full grid should build");

    let (mut host, link) = BusLink::pair().expect("loopback pair");
    let mut bridge = Bridge::over_link(link, table).expect("bridge setup");
    let server = std::thread::spawn(move || bridge.serve().expect("serve should end cleanly"));

    let mut writer = ResponseWriter::new(host.try_clone().expect("clone host link"));

    for address in [mcubridge::frame::CHECK_BUILD, mcubridge::frame::RESET_ADDRESS] {
        writer
            .send_frame(&CommandFrame::new(address, 0x00, 0x1234))
            .expect("frame should send");
        assert_eq!(read_response(&mut host), [0x34, 0x12, 0x00, 0x00]);
    }

    drop(writer);
    drop(host);
    server.join().unwrap();
}
