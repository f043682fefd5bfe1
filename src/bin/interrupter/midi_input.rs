//! MIDI input - hardware notes into the control queue

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use coil_interrupter::{
    io::{converter::midi_to_control, midi::MidiEvent},
    synth::message::ControlMessage,
};
use midir::{Ignore, MidiInput, MidiInputConnection};
use rtrb::Producer;

/// Open the first input port whose name contains `port_hint`.
///
/// Messages are decoded on midir's callback thread and pushed into `tx`; the
/// connection stops when the returned handle is dropped.
pub fn connect(
    port_hint: &str,
    channel_filter: Option<u8>,
    mut tx: Producer<ControlMessage>,
) -> EyreResult<MidiInputConnection<()>> {
    let mut input = MidiInput::new("interrupter").wrap_err("failed to open MIDI input")?;
    input.ignore(Ignore::All);

    let ports = input.ports();
    let port = ports
        .iter()
        .find(|p| {
            input
                .port_name(p)
                .is_ok_and(|name| name.contains(port_hint))
        })
        .ok_or_else(|| eyre!("no MIDI input port matching {port_hint:?}"))?;
    let name = input.port_name(port).wrap_err("failed to read MIDI port name")?;
    log::info!("listening on MIDI port {name}");

    input
        .connect(
            port,
            "interrupter-in",
            move |_stamp, bytes, _| {
                let Some(msg) =
                    MidiEvent::parse(bytes).and_then(|e| midi_to_control(e, channel_filter))
                else {
                    return;
                };
                if tx.push(msg).is_err() {
                    log::warn!("control queue full, dropped {msg:?}");
                }
            },
            (),
        )
        .map_err(|err| eyre!("failed to connect to {name}: {err}"))
}
