//! Replaying a laid-out document onto a drawing surface.
//!
//! Layout never writes bytes. A [`Canvas`] receives every page's commands in
//! order, body first and footer stamps after, and turns them into whatever
//! the backend produces.

use crate::layout::{DrawCommand, PaginatedDocument, Point, Rect, TextRun};
use crate::model::LogoImage;
use crate::style::Color;

pub trait Canvas {
    fn begin_page(&mut self, index: usize, width: f64, height: f64);
    fn draw_text(&mut self, run: &TextRun);
    fn draw_filled_rect(&mut self, rect: &Rect, color: Color);
    fn draw_stroked_line(&mut self, from: Point, to: Point, color: Color, width: f64);
    /// Backends without image support skip logos.
    fn draw_image(&mut self, _rect: &Rect, _image: &LogoImage) {}
    fn end_page(&mut self);
}

impl PaginatedDocument {
    /// Feed every page to `canvas`, in order.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        for page in &self.pages {
            canvas.begin_page(page.index, self.width, self.height);
            for command in page.commands.iter().chain(&page.footer) {
                match command {
                    DrawCommand::Text(run) => canvas.draw_text(run),
                    DrawCommand::FilledRect { rect, color } => canvas.draw_filled_rect(rect, *color),
                    DrawCommand::Line {
                        from,
                        to,
                        color,
                        width,
                    } => canvas.draw_stroked_line(*from, *to, *color, *width),
                    DrawCommand::Image { rect, image } => canvas.draw_image(rect, image),
                }
            }
            canvas.end_page();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Page, TextRole};
    use crate::style::FontSpec;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Canvas for Recorder {
        fn begin_page(&mut self, index: usize, width: f64, height: f64) {
            self.events.push(format!("begin {index} {width}x{height}"));
        }
        fn draw_text(&mut self, run: &TextRun) {
            self.events.push(format!("text {}", run.text));
        }
        fn draw_filled_rect(&mut self, rect: &Rect, _color: Color) {
            self.events.push(format!("rect {}", rect.height));
        }
        fn draw_stroked_line(&mut self, from: Point, _to: Point, _color: Color, _width: f64) {
            self.events.push(format!("line {}", from.y));
        }
        fn end_page(&mut self) {
            self.events.push("end".to_string());
        }
    }

    #[test]
    fn replays_body_then_footer_per_page() {
        let text = |s: &str| {
            DrawCommand::Text(TextRun::new(s, FontSpec::regular("Helvetica", 10.0), TextRole::ItemBody))
        };
        let doc = PaginatedDocument {
            width: 612.0,
            height: 792.0,
            pages: vec![
                Page {
                    index: 0,
                    commands: vec![
                        text("hello"),
                        DrawCommand::Image {
                            rect: Rect {
                                x: 0.0,
                                y: 0.0,
                                width: 10.0,
                                height: 10.0,
                            },
                            image: LogoImage {
                                width: 1,
                                height: 1,
                                data: vec![],
                            },
                        },
                        DrawCommand::FilledRect {
                            rect: Rect {
                                x: 0.0,
                                y: 0.0,
                                width: 5.0,
                                height: 3.0,
                            },
                            color: Color::BLACK,
                        },
                    ],
                    footer: vec![text("Page 1 of 2")],
                },
                Page {
                    index: 1,
                    commands: vec![DrawCommand::Line {
                        from: Point { x: 0.0, y: 40.0 },
                        to: Point { x: 10.0, y: 40.0 },
                        color: Color::BLACK,
                        width: 1.0,
                    }],
                    footer: vec![],
                },
            ],
        };

        let mut canvas = Recorder::default();
        doc.replay(&mut canvas);
        assert_eq!(
            canvas.events,
            vec![
                "begin 0 612x792",
                "text hello",
                "rect 3",
                "text Page 1 of 2",
                "end",
                "begin 1 612x792",
                "line 40",
                "end",
            ]
        );
    }
}
