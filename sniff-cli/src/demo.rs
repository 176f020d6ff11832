//! Demo air traffic for the virtual radio

use sniff_proto::MacAddr;
use sniff_scan::{BleAddrType, PacketKind};
use sniff_sim::{air, AirFrame, BleDevice, VirtualRadio, VirtualRadioConfig};

/// Access points as (channel, BSSID, SSID, RSSI)
const ACCESS_POINTS: &[(u8, [u8; 6], &str, i8)] = &[
    (1, [0x3C, 0x84, 0x6A, 0x10, 0x20, 0x01], "corp-net", -52),
    (6, [0x3C, 0x84, 0x6A, 0x10, 0x20, 0x06], "corner-cafe", -67),
    (6, [0x02, 0x5E, 0x11, 0x00, 0x00, 0x06], "", -81),
    (11, [0xF4, 0xF2, 0x6D, 0x44, 0x55, 0x0B], "guest", -74),
    (13, [0xF4, 0xF2, 0x6D, 0x44, 0x55, 0x0D], "eu-only", -70),
];

/// Another sniffer announcing itself on channel 1
const PEER: MacAddr = MacAddr([0x24, 0x0A, 0xC4, 0x5A, 0x11, 0x02]);

/// BLE devices as (address, type, RSSI, name)
const DEVICES: &[([u8; 6], BleAddrType, i8, &str)] = &[
    ([0xC4, 0x7C, 0x8D, 0x01, 0x02, 0x03], BleAddrType::Random, -71, "tag-01"),
    ([0x00, 0x1A, 0x7D, 0xDA, 0x71, 0x13], BleAddrType::Public, -59, "speaker"),
];

/// Build a virtual radio that hears a small office
pub fn demo_radio(config: VirtualRadioConfig) -> anyhow::Result<VirtualRadio> {
    let mut radio = VirtualRadio::from_config(config);

    for &(channel, bssid, ssid, rssi) in ACCESS_POINTS {
        let beacon = air::beacon_frame(MacAddr(bssid), ssid, channel)?;
        radio.add_frame(channel, AirFrame::management(rssi, beacon))?;
    }

    radio.add_frame(1, AirFrame::management(-44, air::tracerfi_frame(PEER)))?;
    // data traffic is dropped by the capture filter
    radio.add_frame(6, AirFrame::new(PacketKind::Data, -60, vec![0x08; 64]))?;

    for &(address, addr_type, rssi, name) in DEVICES {
        let adv = air::advertisement_data(name)?;
        radio.add_device(BleDevice::new(MacAddr(address), addr_type, rssi, adv));
    }

    Ok(radio)
}
