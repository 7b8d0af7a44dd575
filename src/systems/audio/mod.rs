//! Audio thread and ECS bridge systems.
//!
//! This module hosts the background audio thread and the systems that
//! bridge it with the ECS world:
//! - [`audio_thread`] runs on its own OS thread, owns the raylib audio
//!   device and stream, and processes [`AudioCmd`] messages, emitting
//!   [`AudioMessage`] responses.
//! - [`poll_audio_messages`] non-blockingly drains the audio thread's
//!   message receiver into the ECS message queue each frame.
//! - [`forward_audio_cmds`] pushes queued commands over the channel.
//!
//! The audio thread is the second clock of the two-clock design: its
//! sequencer schedules against the mixer's sample clock, which advances
//! with rendered audio and never stalls when frames drop. BGM restart
//! timing can therefore drift from the visual state by up to one loop
//! period, which is acceptable for ambiance.
//!
//! If the audio device cannot be initialized the thread stays alive and
//! keeps draining commands as silent no-ops.

pub mod melodies;
pub mod sequencer;
pub mod sfx;
pub mod synth;

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::Messages;
use bevy_ecs::{
    prelude::{MessageWriter, Res},
    system::ResMut,
};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};
use raylib::ffi;

use self::sequencer::Sequencer;
use self::synth::{Mixer, SAMPLE_RATE};

/// Samples per stream refill.
const STREAM_CHUNK: usize = 1024;
/// Idle sleep between pump iterations.
const PUMP_SLEEP: std::time::Duration = std::time::Duration::from_millis(2);

/// Drain any pending messages from the audio thread into the ECS
/// [`Messages<AudioMessage>`] mailbox. Non-blocking, runs each frame.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`]. Run after
/// [`poll_audio_messages`] in the schedule.
pub fn update_bevy_audio_messages(mut messages: ResMut<Messages<AudioMessage>>) {
    messages.update();
}

/// Forward ECS AudioCmd messages to the audio thread via the bridge sender.
pub fn forward_audio_cmds(
    bridge: Res<AudioBridge>,
    mut reader: bevy_ecs::prelude::MessageReader<AudioCmd>,
) {
    for cmd in reader.read() {
        // Ignore send errors during shutdown.
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for AudioCmd so same-frame readers can
/// observe writes.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Entry point of the dedicated audio thread.
///
/// Responsibilities:
/// - Initialize the raylib audio device and a mono PCM stream once.
/// - React to [`AudioCmd`] inputs (play/stop music, effects, mute, volume).
/// - Pump the sequencer against the mixer clock and keep the stream fed.
/// - Emit [`AudioMessage`] outputs for state changes.
///
/// Blocks until [`AudioCmd::Shutdown`], then unloads the stream and closes
/// the device.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let device_ready = unsafe {
        ffi::InitAudioDevice();
        ffi::IsAudioDeviceReady()
    };

    let stream = if device_ready {
        unsafe {
            ffi::SetAudioStreamBufferSizeDefault(STREAM_CHUNK as i32);
            let stream = ffi::LoadAudioStream(SAMPLE_RATE, 16, 1);
            ffi::PlayAudioStream(stream);
            Some(stream)
        }
    } else {
        warn!("[audio] device unavailable, playback is a silent no-op");
        let _ = tx_msg.send(AudioMessage::DeviceUnavailable);
        None
    };

    info!(
        "[audio] thread starting (id={:?}, device={})",
        std::thread::current().id(),
        device_ready
    );

    let mut mixer = Mixer::new(SAMPLE_RATE);
    let mut sequencer = Sequencer::new();
    let mut buf = [0i16; STREAM_CHUNK];
    let mut last_silent_tick = std::time::Instant::now();

    'run: loop {
        // 1) Drain commands.
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::PlayBgm { theme } => {
                    debug!("[audio] play bgm {:?}", theme);
                    sequencer.play(theme, &mut mixer);
                    let _ = tx_msg.send(AudioMessage::BgmStarted { theme });
                }
                AudioCmd::StopBgm => {
                    debug!("[audio] stop bgm");
                    sequencer.stop();
                    let _ = tx_msg.send(AudioMessage::BgmStopped);
                }
                AudioCmd::PlaySfx { kind } => {
                    if !sequencer.muted() {
                        sfx::schedule_sfx(&mut mixer, kind);
                    }
                }
                AudioCmd::SetMuted(muted) => {
                    debug!("[audio] muted={}", muted);
                    sequencer.set_muted(muted);
                    let _ = tx_msg.send(AudioMessage::MuteChanged(muted));
                }
                AudioCmd::SetVolume(volume) => {
                    mixer.set_volume(volume);
                }
                AudioCmd::Shutdown => {
                    debug!("[audio] shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Re-arm the BGM loop when its period elapses.
        sequencer.pump(&mut mixer);

        // 3) Keep the stream fed; the mixer clock advances with rendered
        //    samples. Without a device, advance the clock by wall time so
        //    scheduling stays bounded.
        if let Some(stream) = stream {
            unsafe {
                while ffi::IsAudioStreamProcessed(stream) {
                    mixer.render(&mut buf);
                    ffi::UpdateAudioStream(
                        stream,
                        buf.as_ptr() as *const std::ffi::c_void,
                        STREAM_CHUNK as i32,
                    );
                }
            }
        } else {
            let elapsed = last_silent_tick.elapsed();
            last_silent_tick = std::time::Instant::now();
            mixer.advance_silently((elapsed.as_secs_f64() * SAMPLE_RATE as f64) as u64);
        }

        std::thread::sleep(PUMP_SLEEP);
    }

    if let Some(stream) = stream {
        unsafe {
            ffi::StopAudioStream(stream);
            ffi::UnloadAudioStream(stream);
            ffi::CloseAudioDevice();
        }
    }

    info!(
        "[audio] thread exiting (id={:?})",
        std::thread::current().id()
    );
}
