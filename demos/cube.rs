use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    style, terminal, QueueableCommand,
};
use scanline::{
    canvas::Canvas,
    color::Rgba,
    framebuffer::FrameBuffer,
    material::Diffuse,
    math::Point3d,
    preview::{self, Bayer4, Channel},
    scene::{Camera, Instance, Model, Scene, Transform},
    DrawMode, Renderer,
};
use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

const Y_OFF: u16 = 1;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut scene = Scene::new(Camera::new(Point3d::new(0.0, 0.0, -6.0), Point3d::zeros()));
    scene.add_model(Model::cube(
        "cube",
        [
            Rgba::opaque(255, 64, 64),
            Rgba::opaque(64, 255, 64),
            Rgba::opaque(64, 64, 255),
            Rgba::opaque(255, 255, 64),
            Rgba::opaque(64, 255, 255),
            Rgba::opaque(255, 64, 255),
        ],
    ));

    // Two cubes: one spinning in place, one bobbing through the near plane.
    let transforms = |secs: f64| {
        [
            Transform {
                translation: Point3d::new(-1.2, 0.0, 0.0),
                rotation: Point3d::new(secs * 40.0, secs * 60.0, 0.0),
                ..Default::default()
            },
            Transform {
                translation: Point3d::new(1.2, 0.0, -3.0 * libm::sin(secs)),
                rotation: Point3d::new(0.0, secs * -30.0, secs * 20.0),
                scale: Point3d::new(1.5, 1.5, 1.5),
            },
        ]
    };

    let mut renderer = Renderer::new(DrawMode::Outlined(Rgba::WHITE));
    let material = Diffuse::default();

    let mut stdout = stdout();
    terminal::enable_raw_mode()?;

    // Errors inside the loop still fall through to the terminal restore below.
    let mut run = |stdout: &mut Stdout| -> anyhow::Result<()> {
        stdout.queue(cursor::Hide)?;
        stdout.queue(terminal::Clear(terminal::ClearType::All))?;

        let time = Instant::now();
        let mut frame = 0u64;

        loop {
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                        break;
                    }
                }
            }

            let start = time.elapsed();

            let (w, h) = terminal::size()?;
            let (cols, rows) = (w as usize, h.saturating_sub(Y_OFF) as usize);
            let (cx, cy) = preview::term_char_aspect();
            let (width, height) = (cols.max(1), (rows * cy / cx).max(1));

            let canvas = Canvas {
                viewport_width: width as f64 / height as f64,
                ..Canvas::with_size(width, height)
            };
            let mut fb = FrameBuffer::new(canvas)?;

            scene.instances.clear();
            for t in transforms(start.as_secs_f64()) {
                scene.add_instance(Instance::new("cube", t));
            }

            let stats = renderer.render(&scene, &material, &mut fb)?;
            let text = preview::to_ascii(&fb, cols, Channel::Luminance, &Bayer4);

            for (y, line) in text.lines().enumerate() {
                stdout.queue(cursor::MoveTo(0, y as u16 + Y_OFF))?;
                stdout.queue(style::Print(line))?;
            }

            let drawn = time.elapsed() - start;
            stdout.queue(cursor::MoveTo(0, 0))?;
            stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
            stdout.queue(style::SetForegroundColor(style::Color::White))?;
            stdout.queue(style::Print(format!(
                "{frame} {:.02}ms | {} drawn, {} culled, {} clip vertices | q to quit",
                drawn.as_secs_f32() * 1000.0,
                stats.triangles_drawn,
                stats.triangles_culled,
                stats.vertices_added,
            )))?;
            stdout.queue(style::ResetColor)?;
            stdout.flush()?;

            frame += 1;
        }

        Ok(())
    };
    let result = run(&mut stdout);

    terminal::disable_raw_mode()?;
    stdout.queue(cursor::Show)?;
    stdout.queue(style::ResetColor)?;
    stdout.flush()?;

    result
}
