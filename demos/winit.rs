//! Interactive page curl demo: drag the mouse across the window to peel the
//! page, click to let the curl snap to the cursor.

use std::sync::Arc;

use futures::executor::block_on;
use kami::{pointer_to_ndc, Color, Renderer};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const PAGE_TEXTURE_ID: u64 = 1;
const TEXTURE_SIZE: u32 = 512;

/// A paper-and-ink checkerboard so the curl is visible without shipping an
/// image asset.
fn page_texture() -> Vec<u8> {
    let image = image::RgbaImage::from_fn(TEXTURE_SIZE, TEXTURE_SIZE, |x, y| {
        if ((x / 64) + (y / 64)) % 2 == 0 {
            image::Rgba([235, 224, 187, 255])
        } else {
            image::Rgba([158, 107, 78, 255])
        }
    });
    image.into_raw()
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer<'static>>,
    cursor: (f32, f32),
    dragging: bool,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("kami page curl"))
                .unwrap(),
        );
        let size = window.inner_size();
        let mut renderer =
            block_on(Renderer::new(window.clone(), (size.width, size.height))).unwrap();

        renderer
            .texture_manager()
            .allocate_texture_with_data(
                PAGE_TEXTURE_ID,
                (TEXTURE_SIZE, TEXTURE_SIZE),
                &page_texture(),
            )
            .unwrap();
        renderer.set_page_texture(PAGE_TEXTURE_ID).unwrap();
        renderer.set_clear_color(Color::WHITE);

        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let (Some(window), Some(renderer)) = (self.window.as_ref(), self.renderer.as_mut()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                renderer.resize((size.width, size.height)).unwrap();
                window.request_redraw();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = pointer_to_ndc((position.x, position.y), renderer.size());
                if self.dragging {
                    renderer.set_pointer(self.cursor.0, self.cursor.1);
                    window.request_redraw();
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.dragging = true;
                    renderer.press_pointer(self.cursor.0, self.cursor.1);
                    window.request_redraw();
                }
                ElementState::Released => {
                    self.dragging = false;
                }
            },
            WindowEvent::RedrawRequested => {
                if let Err(e) = renderer.render() {
                    eprintln!("render error: {e}");
                }
                if renderer.is_animating() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut App::default()).unwrap();
}
