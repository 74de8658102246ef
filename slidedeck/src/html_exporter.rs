//! HTML exporter for slide decks
//!
//! Writes a single self-contained HTML file with:
//! - One `<section>` per slide, title slides marked with the `title` class
//! - Images embedded through their asset locators (data URLs)
//! - Keyboard navigation and a click-to-zoom image viewer

use crate::assets::ResourceStore;
use crate::deck::Deck;
use crate::renderer::escape_html;
use crate::segmenter::SlideKind;
use crate::viewport::ViewportConfig;
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during HTML export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Summary of an export run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub slides: usize,
    pub images: usize,
    pub unresolved_images: usize,
}

/// Export a deck to an HTML file
///
/// # Parameters
/// * `deck` - The deck to export
/// * `viewer` - Zoom limits written into the page's image viewer
/// * `output_path` - Path where the HTML file will be written
///
/// # Returns
/// * `Ok(ExportStats)` - Successfully exported
/// * `Err(ExportError)` - Error writing the file
pub fn to_html<S: ResourceStore>(
    deck: &Deck<S>,
    viewer: &ViewportConfig,
    output_path: &Path,
) -> Result<ExportStats, ExportError> {
    let (output, stats) = render_deck(deck, viewer);

    // Write to file - create parent directories if they don't exist
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(output.as_bytes())?;

    log::info!(
        "Wrote {} slides ({} images) to {}",
        stats.slides,
        stats.images,
        output_path.display()
    );
    Ok(stats)
}

/// Render the whole deck to an HTML string
pub fn render_deck<S: ResourceStore>(deck: &Deck<S>, viewer: &ViewportConfig) -> (String, ExportStats) {
    let mut output = String::new();
    let mut stats = ExportStats::default();

    write_html_header(&mut output, deck.title());

    output.push_str(&format!(
        "<body data-min-scale=\"{}\" data-max-scale=\"{}\" data-wheel-sensitivity=\"{}\" data-zoom-in=\"{}\" data-zoom-out=\"{}\">\n",
        viewer.min_scale,
        viewer.max_scale,
        viewer.wheel_sensitivity,
        viewer.zoom_in_factor,
        viewer.zoom_out_factor
    ));
    output.push_str("<main class=\"deck\">\n");

    for slide in deck.slides() {
        let Some(rendered) = deck.render_slide(slide.index) else {
            continue;
        };
        let class = match slide.kind() {
            SlideKind::Title => "slide title",
            SlideKind::Content => "slide",
        };
        output.push_str(&format!(
            "<section class=\"{}\" id=\"slide-{}\">\n",
            class,
            slide.index + 1
        ));
        output.push_str(&rendered.html);
        output.push_str(&format!(
            "<footer class=\"slide-number\">{} / {}</footer>\n",
            slide.index + 1,
            deck.slides().len()
        ));
        output.push_str("</section>\n");

        stats.slides += 1;
        stats.images += rendered.images.len();
        stats.unresolved_images += rendered.unresolved.len();
    }

    output.push_str("</main>\n");
    output.push_str(VIEWER_MARKUP);
    output.push_str("<script>\n");
    output.push_str(VIEWER_SCRIPT);
    output.push_str("</script>\n");
    output.push_str("</body>\n");
    output.push_str("</html>\n");

    (output, stats)
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

const VIEWER_MARKUP: &str = r#"<div class="viewer" hidden>
<div class="viewer-stage"><img class="viewer-image" alt=""></div>
<div class="viewer-controls">
<button data-zoom="in">+</button><button data-zoom="out">&minus;</button><button data-zoom="reset">1:1</button><button data-zoom="close">&times;</button>
</div>
</div>
"#;

/// Page runtime: slide navigation and the zoom/pan viewer
const VIEWER_SCRIPT: &str = r#"
(function () {
  const slides = Array.from(document.querySelectorAll('.slide'));
  let current = 0;
  function show(i) {
    if (i < 0 || i >= slides.length) return;
    current = i;
    slides[i].scrollIntoView({ behavior: 'smooth' });
  }

  const cfg = document.body.dataset;
  const minScale = parseFloat(cfg.minScale), maxScale = parseFloat(cfg.maxScale);
  const viewer = document.querySelector('.viewer');
  const stage = viewer.querySelector('.viewer-stage');
  const img = viewer.querySelector('.viewer-image');
  let scale = 1, ox = 0, oy = 0, drag = null;

  function clampOffset() {
    const hx = Math.max(0, (img.offsetWidth * scale - stage.clientWidth) / 2);
    const hy = Math.max(0, (img.offsetHeight * scale - stage.clientHeight) / 2);
    ox = hx <= 0 ? 0 : Math.min(hx, Math.max(-hx, ox));
    oy = hy <= 0 ? 0 : Math.min(hy, Math.max(-hy, oy));
  }
  function apply() {
    clampOffset();
    img.style.transform = 'translate(' + ox + 'px, ' + oy + 'px) scale(' + scale + ')';
  }
  function zoomAround(ax, ay, factor) {
    const next = Math.min(maxScale, Math.max(minScale, scale * factor));
    ox = ax - ((ax - ox) / scale) * next;
    oy = ay - ((ay - oy) / scale) * next;
    scale = next;
    apply();
  }
  function reset() { scale = 1; ox = 0; oy = 0; drag = null; apply(); }
  function open(src) { img.src = src; viewer.hidden = false; reset(); }
  function close() { viewer.hidden = true; drag = null; }

  document.querySelectorAll('img[data-asset]').forEach(function (el) {
    el.addEventListener('click', function () { open(el.src); });
  });
  stage.addEventListener('wheel', function (e) {
    e.preventDefault();
    const r = stage.getBoundingClientRect();
    zoomAround(e.clientX - r.left - r.width / 2, e.clientY - r.top - r.height / 2,
      1 - e.deltaY * parseFloat(cfg.wheelSensitivity));
  }, { passive: false });
  stage.addEventListener('mousedown', function (e) {
    if (e.button !== 0 || scale <= 1) return;
    drag = { x: e.clientX, y: e.clientY, ox: ox, oy: oy };
  });
  stage.addEventListener('mousemove', function (e) {
    if (!drag) return;
    ox = drag.ox + (e.clientX - drag.x);
    oy = drag.oy + (e.clientY - drag.y);
    apply();
  });
  stage.addEventListener('mouseup', function () { drag = null; });
  stage.addEventListener('mouseleave', function () { drag = null; });
  viewer.querySelectorAll('button').forEach(function (b) {
    b.addEventListener('click', function () {
      const action = b.dataset.zoom;
      if (action === 'in') zoomAround(0, 0, parseFloat(cfg.zoomIn));
      else if (action === 'out') zoomAround(0, 0, parseFloat(cfg.zoomOut));
      else if (action === 'reset') reset();
      else close();
    });
  });

  document.addEventListener('keydown', function (e) {
    if (!viewer.hidden) { if (e.key === 'Escape') close(); return; }
    if (e.key === 'ArrowRight' || e.key === 'PageDown' || e.key === ' ') show(current + 1);
    else if (e.key === 'ArrowLeft' || e.key === 'PageUp') show(current - 1);
    else if (e.key === 'Home') show(0);
    else if (e.key === 'End') show(slides.length - 1);
  });
})();
"#;

/// Slide styles with sans-serif fonts
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

html {
    scroll-snap-type: y mandatory;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.5;
    color: #333;
    background-color: #222;
}

.slide {
    position: relative;
    width: 100vw;
    height: 100vh;
    scroll-snap-align: start;
    background: white;
    padding: 6vh 8vw;
    overflow: hidden;
    border-bottom: 1px solid #ddd;
    font-size: 2.6vh;
}

.slide.title {
    display: flex;
    flex-direction: column;
    justify-content: center;
    align-items: center;
    text-align: center;
    background: #0066cc;
    color: white;
}

.slide.title h1 {
    font-size: 3em;
    border: none;
    color: white;
}

h1, h2 {
    color: #1a1a1a;
    margin-bottom: 0.6em;
    border-bottom: 2px solid #e0e0e0;
    padding-bottom: 0.2em;
}

h1 { font-size: 2.2em; }
h2 { font-size: 1.8em; }
h3 { font-size: 1.3em; margin: 0.8em 0 0.4em; }

p, ul, ol, pre, table, blockquote {
    margin-bottom: 0.8em;
}

ul, ol {
    padding-left: 1.4em;
}

code {
    font-family: 'Monaco', 'Menlo', 'Ubuntu Mono', 'Consolas', monospace;
    background-color: #f4f4f4;
    padding: 2px 6px;
    border-radius: 3px;
    font-size: 0.9em;
    color: #d73a49;
}

pre {
    background-color: #f6f8fa;
    padding: 1em;
    border-radius: 6px;
    overflow: auto;
}

pre code {
    background: none;
    padding: 0;
    color: inherit;
}

blockquote {
    border-left: 4px solid #0066cc;
    padding-left: 1em;
    color: #555;
}

table {
    border-collapse: collapse;
}

th, td {
    border: 1px solid #ddd;
    padding: 0.3em 0.7em;
}

.slide img {
    max-width: 100%;
    max-height: 60vh;
}

img[data-asset] {
    cursor: zoom-in;
}

.slide-number {
    position: absolute;
    right: 2vw;
    bottom: 2vh;
    font-size: 0.7em;
    color: #999;
}

.viewer {
    position: fixed;
    inset: 0;
    background: rgba(0, 0, 0, 0.9);
    z-index: 10;
}

.viewer[hidden] {
    display: none;
}

.viewer-stage {
    position: absolute;
    inset: 0 0 60px 0;
    display: flex;
    align-items: center;
    justify-content: center;
    overflow: hidden;
}

.viewer-image {
    max-width: 100%;
    max-height: 100%;
    transform-origin: center;
    user-select: none;
}

.viewer-controls {
    position: absolute;
    bottom: 12px;
    width: 100%;
    text-align: center;
}

.viewer-controls button {
    min-width: 44px;
    margin: 0 4px;
    padding: 6px 10px;
    font-size: 18px;
}
"#;
