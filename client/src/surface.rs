//! DOM-backed layout surface
//!
//! The container is measured; the board element created inside it is sized
//! from each computed layout. Card boxes are positioned by the host from
//! the board view.

use pairs_core::layout::{InnerWidth, Layout, Surface};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Class name given to the board element
pub const BOARD_CLASS: &str = "pairs-board";

pub struct DomSurface {
    container: HtmlElement,
    board: HtmlElement,
}

impl DomSurface {
    /// Create the board element inside `container`
    pub fn attach(container: HtmlElement) -> Result<Self, JsValue> {
        let document = container
            .owner_document()
            .ok_or_else(|| JsValue::from_str("container is not part of a document"))?;
        let board: HtmlElement = document
            .create_element("div")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("board element is not an HtmlElement"))?;
        board.set_class_name(BOARD_CLASS);
        container.append_child(&board)?;
        Ok(Self { container, board })
    }

    /// Remove the board element from the page
    pub fn detach(&self) {
        self.board.remove();
    }
}

impl Surface for DomSurface {
    fn container_width(&self) -> u32 {
        self.container.client_width().max(0) as u32
    }

    fn viewport_height(&self) -> u32 {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .map(|root| root.client_height().max(0) as u32)
            .unwrap_or(0)
    }

    fn apply(&mut self, layout: &Layout) {
        let width = match layout.inner_width {
            InnerWidth::Full => "100%".to_string(),
            InnerWidth::Fixed(px) => format!("{}px", px),
        };
        let style = self.board.style();
        let applied = style
            .set_property("width", &width)
            .and_then(|_| style.set_property("height", &format!("{}px", layout.bound_height())));
        if let Err(e) = applied {
            pairs_core::log::error(&format!("failed to size board: {:?}", e));
        }
    }
}
