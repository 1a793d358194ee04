//! GTK4 host for the heatmap that runs on the **main thread**.
//!
//! # Widget tree
//!
//! ```text
//! window                         (optionally layer-shell, borderless)
//! └ .heatmap-root               (vertical box)
//!     ├ .heatmap                (GtkDrawingArea, cairo)
//!     │   └ .heatmap-menu       (popover with a single "Close" button)
//!     └ .heatmap-footer         (GtkCenterBox)
//!         ├ .heatmap-version    (start: "v0.1.0")
//!         └ .heatmap-countdown  (center: "Next update in: N seconds")
//! ```
//!
//! # CSS selectors
//!
//! | Selector               | Targets                                  |
//! |------------------------|------------------------------------------|
//! | `window`               | The widget window                        |
//! | `.heatmap-footer`      | Bar below the grid                       |
//! | `.heatmap-countdown`   | Countdown label                          |
//! | `.heatmap-version`     | Version label                            |
//! | `.heatmap-menu`        | Context menu popover                     |
//!
//! The cells themselves are drawn with cairo and are not styled by CSS.

use crate::config::WidgetConfig;
use crate::platform::{Platform, BUTTON_PRIMARY};
use crate::render::{Color, DrawCommand};
use crate::source::FetchOutcome;
use crate::traits::PriceApi;
use crate::widget::WidgetState;
#[cfg(target_os = "linux")]
use crate::widget::WindowDrag;
use gtk4::prelude::*;
use gtk4::{cairo, gdk, glib};
#[cfg(target_os = "linux")]
use gtk4_layer_shell::{Edge, LayerShell};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

/// Initial distance from the top-left screen corner on layer-shell
/// compositors (px).
#[cfg(target_os = "linux")]
const INITIAL_MARGIN: i32 = 40;

const FONT_FAMILY: &str = "Arial";

//  Default CSS

const DEFAULT_CSS: &str = r#"
window,
window.background {
    background-color: #1e1e1e;
}

.heatmap-footer {
    padding: 5px;
}

.heatmap-countdown {
    color: white;
    font-family: Arial, sans-serif;
    font-size: 12pt;
    font-weight: bold;
}

.heatmap-version {
    color: white;
    font-family: Arial, sans-serif;
    font-size: 10pt;
    font-weight: bold;
}
"#;

/// Errors that prevent the widget from starting.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("failed to initialise GTK4: {0}")]
    Init(String),
}

/// How primary-button drags reposition the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveStrategy {
    /// Layer-shell surface: anchored top-left, moved through its margins.
    #[cfg(target_os = "linux")]
    LayerShellMargins,
    /// Ordinary toplevel: the compositor runs an interactive move.
    Compositor,
}

/// Turn `window` into a top-left anchored layer-shell surface when the
/// platform and compositor allow it.
#[cfg(target_os = "linux")]
fn init_placement(window: &gtk4::Window, platform: Platform) -> MoveStrategy {
    if !platform.layer_shell || !gtk4_layer_shell::is_supported() {
        return MoveStrategy::Compositor;
    }
    window.init_layer_shell();
    window.set_layer(gtk4_layer_shell::Layer::Top);
    window.set_namespace("cryptogrid");
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::None);
    window.set_anchor(Edge::Top, true);
    window.set_anchor(Edge::Left, true);
    window.set_margin(Edge::Top, INITIAL_MARGIN);
    window.set_margin(Edge::Left, INITIAL_MARGIN);
    MoveStrategy::LayerShellMargins
}

#[cfg(not(target_os = "linux"))]
fn init_placement(_window: &gtk4::Window, _platform: Platform) -> MoveStrategy {
    MoveStrategy::Compositor
}

//  Public API

/// Run the GTK4 main loop on the **current** (main) thread.
///
/// Performs the initial fetch, shows the window and arms both timers.
/// Returns once the user picks "Close" or closes the window.
pub fn run_main_loop<A: PriceApi + 'static>(
    state: WidgetState<A>,
    refresh_interval: Duration,
    config: &WidgetConfig,
    platform: Platform,
    css_path: Option<PathBuf>,
) -> Result<(), WidgetError> {
    gtk4::init().map_err(|e| WidgetError::Init(e.to_string()))?;
    info!("GTK4 initialised on main thread ({:?})", platform);

    load_css(&css_path);

    let main_loop = glib::MainLoop::new(None, false);
    let state = Rc::new(RefCell::new(state));

    //  Window
    let window = gtk4::Window::new();
    window.set_title(Some(config.title.as_str()));
    window.set_default_size(config.width, config.height);
    window.set_decorated(!platform.borderless);

    let strategy = init_placement(&window, platform);
    info!("window move strategy: {:?}", strategy);

    {
        let main_loop = main_loop.clone();
        window.connect_close_request(move |_| {
            info!("window closed");
            main_loop.quit();
            glib::Propagation::Proceed
        });
    }

    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 0);
    root.add_css_class("heatmap-root");
    window.set_child(Some(&root));

    //  Canvas
    let area = gtk4::DrawingArea::new();
    area.add_css_class("heatmap");
    area.set_hexpand(true);
    area.set_vexpand(true);
    {
        let state = state.clone();
        area.set_draw_func(move |_area, cr, width, height| {
            let commands = state.borrow().draw_commands(width as f64, height as f64);
            if let Err(e) = paint(cr, &commands) {
                warn!("cairo error while drawing: {}", e);
            }
        });
    }
    area.connect_resize(|area, width, height| {
        debug!("canvas resized to {}x{}", width, height);
        area.queue_draw();
    });
    root.append(&area);

    //  Footer
    let footer = gtk4::CenterBox::new();
    footer.add_css_class("heatmap-footer");
    let version = gtk4::Label::new(Some(concat!("v", env!("CARGO_PKG_VERSION"))));
    version.add_css_class("heatmap-version");
    let countdown = gtk4::Label::new(None);
    countdown.add_css_class("heatmap-countdown");
    footer.set_start_widget(Some(&version));
    footer.set_center_widget(Some(&countdown));
    root.append(&footer);

    install_context_menu(&area, platform, &main_loop);
    install_drag(&area, &window, platform, strategy);
    install_zoom(&area, &state);

    //  Initial fetch + first countdown tick
    let outcome = state.borrow_mut().refresh();
    log_outcome(&outcome);
    countdown.set_text(state.borrow_mut().tick());
    window.present();

    //  Data timer
    {
        let state = state.clone();
        let area = area.clone();
        glib::timeout_add_local(refresh_interval, move || {
            let outcome = state.borrow_mut().refresh();
            log_outcome(&outcome);
            area.queue_draw();
            glib::ControlFlow::Continue
        });
    }

    //  Countdown timer
    {
        let state = state.clone();
        glib::timeout_add_local(Duration::from_secs(1), move || {
            countdown.set_text(state.borrow_mut().tick());
            glib::ControlFlow::Continue
        });
    }

    info!(
        "widget ready (refresh every {}s, CSS: {})",
        refresh_interval.as_secs(),
        css_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<built-in>".into()),
    );

    info!("entering GLib main loop");
    main_loop.run();
    info!("GLib main loop exited");
    Ok(())
}

fn log_outcome(outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Fetched => debug!("refresh: new quotes, countdown reset"),
        FetchOutcome::Cached => debug!("refresh: cache still fresh"),
        FetchOutcome::Failed(e) => debug!("refresh: keeping stale quotes ({})", e),
    }
}

//  Pointer handling

fn install_context_menu(area: &gtk4::DrawingArea, platform: Platform, main_loop: &glib::MainLoop) {
    let popover = gtk4::Popover::new();
    popover.add_css_class("heatmap-menu");
    popover.set_has_arrow(false);
    popover.set_parent(area);

    let close = gtk4::Button::with_label("Close");
    close.add_css_class("flat");
    {
        let popover = popover.clone();
        let main_loop = main_loop.clone();
        close.connect_clicked(move |_| {
            info!("close requested from context menu");
            popover.popdown();
            main_loop.quit();
        });
    }
    popover.set_child(Some(&close));

    let click = gtk4::GestureClick::new();
    // 0 = listen to every button; the platform decides which one counts.
    click.set_button(0);
    click.connect_pressed(move |gesture, _n_press, x, y| {
        let button = gesture.current_button();
        let control = gesture
            .current_event_state()
            .contains(gdk::ModifierType::CONTROL_MASK);
        if platform.context_menu.matches(button, control) {
            debug!("context menu at ({:.0}, {:.0})", x, y);
            popover.set_pointing_to(Some(&gdk::Rectangle::new(x as i32, y as i32, 1, 1)));
            popover.popup();
            gesture.set_state(gtk4::EventSequenceState::Claimed);
        }
    });
    area.add_controller(click);
}

fn install_drag(
    area: &gtk4::DrawingArea,
    window: &gtk4::Window,
    platform: Platform,
    strategy: MoveStrategy,
) {
    let drag = gtk4::GestureDrag::new();
    drag.set_button(BUTTON_PRIMARY);

    {
        let window = window.clone();
        let area = area.clone();
        drag.connect_drag_begin(move |gesture, x, y| {
            let control = gesture
                .current_event_state()
                .contains(gdk::ModifierType::CONTROL_MASK);
            if !platform.starts_drag(BUTTON_PRIMARY, control) {
                gesture.set_state(gtk4::EventSequenceState::Denied);
                return;
            }
            if strategy == MoveStrategy::Compositor {
                begin_compositor_move(&window, &area, gesture, x, y);
            }
        });
    }

    #[cfg(target_os = "linux")]
    if strategy == MoveStrategy::LayerShellMargins {
        let tracker = RefCell::new(WindowDrag::new(INITIAL_MARGIN, INITIAL_MARGIN));
        let window = window.clone();
        drag.connect_drag_update(move |_gesture, dx, dy| {
            let (x, y) = tracker.borrow_mut().apply(dx, dy);
            window.set_margin(Edge::Left, x);
            window.set_margin(Edge::Top, y);
        });
    }

    area.add_controller(drag);
}

/// Hand the drag to the compositor as an interactive window move.
fn begin_compositor_move(
    window: &gtk4::Window,
    area: &gtk4::DrawingArea,
    gesture: &gtk4::GestureDrag,
    x: f64,
    y: f64,
) {
    let Some(surface) = window.surface() else {
        return;
    };
    let Ok(toplevel) = surface.downcast::<gdk::Toplevel>() else {
        debug!("window surface is not a toplevel, cannot move");
        return;
    };
    let Some(device) = gesture.device() else {
        return;
    };
    let (sx, sy) = area.translate_coordinates(window, x, y).unwrap_or((x, y));
    toplevel.begin_move(
        &device,
        BUTTON_PRIMARY as i32,
        sx,
        sy,
        gesture.current_event_time(),
    );
}

fn install_zoom<A: PriceApi + 'static>(
    area: &gtk4::DrawingArea,
    state: &Rc<RefCell<WidgetState<A>>>,
) {
    let scroll = gtk4::EventControllerScroll::new(gtk4::EventControllerScrollFlags::VERTICAL);
    let state = state.clone();
    let target = area.clone();
    scroll.connect_scroll(move |_, _dx, dy| {
        let scale = state.borrow_mut().scroll(dy);
        debug!("zoom {:.2}", scale);
        target.queue_draw();
        glib::Propagation::Stop
    });
    area.add_controller(scroll);
}

//  Cairo

fn set_color(cr: &cairo::Context, color: Color) {
    cr.set_source_rgb(color.r, color.g, color.b);
}

/// Clear the surface and execute `commands` in order.
fn paint(cr: &cairo::Context, commands: &[DrawCommand]) -> Result<(), cairo::Error> {
    set_color(cr, Color::BACKGROUND);
    cr.paint()?;
    cr.select_font_face(FONT_FAMILY, cairo::FontSlant::Normal, cairo::FontWeight::Bold);

    for command in commands {
        match command {
            DrawCommand::Rect {
                rect,
                fill,
                outline,
                outline_width,
            } => {
                cr.rectangle(rect.x, rect.y, rect.width, rect.height);
                set_color(cr, *fill);
                cr.fill_preserve()?;
                set_color(cr, *outline);
                cr.set_line_width(*outline_width);
                cr.stroke()?;
            }
            DrawCommand::Text {
                x,
                y,
                text,
                size,
                color,
            } => {
                if *size == 0 {
                    continue;
                }
                cr.set_font_size(*size as f64);
                let extents = cr.text_extents(text)?;
                cr.move_to(
                    x - extents.width() / 2.0 - extents.x_bearing(),
                    y - extents.height() / 2.0 - extents.y_bearing(),
                );
                set_color(cr, *color);
                cr.show_text(text)?;
            }
        }
    }
    Ok(())
}

//  CSS loading

fn load_css(css_path: &Option<PathBuf>) {
    let provider = gtk4::CssProvider::new();

    let css_content = match css_path.as_ref().filter(|p| p.exists()) {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(content) => {
                info!("user CSS: {} ({} bytes)", p.display(), content.len());
                content
            }
            Err(e) => {
                warn!("CSS read failed ({}): {}, using built-in", p.display(), e);
                DEFAULT_CSS.to_string()
            }
        },
        None => {
            info!("no user CSS, using built-in default");
            DEFAULT_CSS.to_string()
        }
    };

    #[allow(deprecated)]
    provider.load_from_data(&css_content);

    if let Some(display) = gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
        debug!("CSS registered on display");
    } else {
        warn!("no GDK display, CSS will not be applied");
    }
}
