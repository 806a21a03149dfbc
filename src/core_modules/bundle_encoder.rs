// THEORY:
// The `bundle_encoder` turns one frame's filtered blob list into the atomic
// OSC bundle the consumer expects. It is the crate's single point of truth
// for the wire format.
//
// Key architectural principles:
// 1.  **Header First, Records In Order**: a bundle opens with a `/header`
//     message announcing the record count, followed by one `/blobN` record
//     per blob in list order. Addresses are 1-indexed and purely
//     positional; the header count is the authoritative linkage, and a
//     decoder must never rely on address arithmetic beyond position.
// 2.  **Empty-List Short-Circuit**: an empty blob list produces no bundle at
//     all. Silence, not an empty header, is the "nothing this frame"
//     signal, and it keeps the transport untouched on quiet frames.
// 3.  **Stateless & Deterministic**: identical blob lists encode to
//     identical bytes. The encoder holds no state between frames.

use crate::core_modules::blob::Blob;
use rosc::{encoder, OscBundle, OscMessage, OscPacket, OscTime, OscType};

/// Address of the per-frame count announcement.
pub const HEADER_ADDRESS: &str = "/header";

/// Builds the message bundle for one frame, or `None` for an empty list.
pub fn build_bundle(blobs: &[Blob]) -> Option<OscBundle> {
    if blobs.is_empty() {
        return None;
    }

    let mut content = Vec::with_capacity(blobs.len() + 1);
    content.push(OscPacket::Message(OscMessage {
        addr: HEADER_ADDRESS.to_string(),
        args: vec![
            OscType::String(String::new()),
            OscType::Int(blobs.len() as i32),
        ],
    }));

    for (index, blob) in blobs.iter().enumerate() {
        let rect = &blob.bounding_box;
        content.push(OscPacket::Message(OscMessage {
            addr: format!("/blob{}", index + 1),
            args: vec![
                OscType::Float(rect.x),
                OscType::Float(rect.y),
                OscType::Float(rect.width),
                OscType::Float(rect.height),
            ],
        }));
    }

    Some(OscBundle {
        timetag: OscTime::from((0, 1)),
        content,
    })
}

/// Encodes one frame's bundle to datagram bytes. `None` means either an
/// empty list (the defined suppression case) or an encoding failure, which
/// is logged and treated as a dropped frame.
pub fn encode_bundle(blobs: &[Blob]) -> Option<Vec<u8>> {
    let bundle = build_bundle(blobs)?;
    match encoder::encode(&OscPacket::Bundle(bundle)) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::error!("failed to encode blob bundle: {err:?}");
            None
        }
    }
}
