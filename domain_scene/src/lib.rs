//! # domain_scene
//!
//! Hand-gesture driven particle scene.  Each detected hand pose selects a
//! technique; twenty thousand particles blend toward that technique's
//! target shape while the whole cloud follows the palm.
//!
//! ## Gesture → Technique mapping
//!
//! | Gesture | Hands | Technique |
//! |---|---|---|
//! | Thumb + all fingers up, palm toward camera | exactly one | Blood Manipulation |
//! | Fist held for three detections | any | Black Flash |
//! | Pinch + middle up | any | Secret Technique: Hollow Purple |
//! | Thumb + pinky up | any | Self-Embodiment of Perfection |
//! | Thumb up only | any | Idle Death Gamble |
//! | Index + pinky up | any | Chimera Shadow Garden |
//! | Index + middle + ring up | any | Cursed Technique: Dismantle |
//! | Middle + ring up | any | Malevolent Shrine |
//! | Index + middle up | any | Infinite Void |
//! | Index up only | any | Reverse Cursed Technique: Red |
//! | anything else | any | Neutral State |
//!
//! The first hand that yields a decision wins; later hands are ignored.
//!
//! ## Frame loop
//!
//! A [`source::HandSource`] thread publishes into a one-slot
//! [`mailbox::Mailbox`].  Each display frame [`driver::FrameDriver::tick`]
//! takes the newest detection (if any), classifies it, updates the
//! [`scene::Scene`] and the [`orientation::OrientationController`], and
//! returns a [`driver::RenderFrame`] for the [`visualizer::Visualizer`].
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: keyboard keys select synthetic poses.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Pose |
//! |---|---|
//! | `0` | No hands |
//! | `1`–`7` | Red, Void, Purple, Shrine, Mahito, Hakari, Megumi |
//! | `8` | Fist (Black Flash after three detections) |
//! | `9` | Dismantle |
//! | `B` | Blood (single palm toward camera) |
//! | `T` | Two hands, both Purple |
//! | arrows | Move the simulated hand |
//! | `Q` / `Esc` | Quit |

pub mod config;
pub mod mailbox;
pub mod palm;
pub mod orientation;
pub mod listener;
pub mod scene;
pub mod driver;
pub mod source;
pub mod visualizer;
pub mod app;

pub use config::{SceneConfig, SceneError};
pub use driver::{FrameDriver, RenderFrame};
pub use listener::{FrameDiagnostics, LoggingListener, NullListener, SceneListener};
pub use mailbox::Mailbox;
pub use orientation::OrientationController;
pub use scene::{ParticleBuffers, Scene};
pub use source::{spawn_hand_source, HandSource, SimHandSource, SimInput, SimPose, SourceHandle};
