//! DOM implementation of [`ControlSurface`].

use super::{ids, BindError, ControlSurface, PLOT_LOADING_HTML};
use crate::js::{call_method as call, global, jquery};
use crate::state::DatasetOption;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement, HtmlOptionElement, HtmlSelectElement};

/// The page's selectors, legend, loader and plot modal.
pub struct DomControls {
    document: Document,
    dataset: HtmlSelectElement,
    variable: HtmlSelectElement,
    style: HtmlSelectElement,
    legend: Element,
    loader: Element,
    plot_container: Element,
    plot_modal: Element,
    /// Optional; not every page offers a vertical level field
    vertical_level: Option<HtmlInputElement>,
}

impl DomControls {
    /// Looks up every control by its element ID.
    pub fn new(document: Document) -> Result<Self, BindError> {
        Ok(Self {
            dataset: typed_element(&document, ids::DATASET)?,
            variable: typed_element(&document, ids::VARIABLE)?,
            style: typed_element(&document, ids::STYLE)?,
            legend: element(&document, ids::LEGEND)?,
            loader: element(&document, ids::LOADER)?,
            plot_container: element(&document, ids::PLOT_CONTAINER)?,
            plot_modal: element(&document, ids::PLOT_MODAL)?,
            vertical_level: document
                .get_element_by_id(ids::VERTICAL_LEVEL)
                .and_then(|e| e.dyn_into().ok()),
            document,
        })
    }

    pub fn dataset_select(&self) -> &HtmlSelectElement {
        &self.dataset
    }

    pub fn variable_select(&self) -> &HtmlSelectElement {
        &self.variable
    }

    pub fn style_select(&self) -> &HtmlSelectElement {
        &self.style
    }

    fn replace_options(&self, select: &HtmlSelectElement, names: &[String], selected: Option<&str>) {
        select.set_length(0);
        for name in names {
            let is_selected = selected == Some(name.as_str());
            match HtmlOptionElement::new_with_text_and_value_and_default_selected_and_selected(
                name,
                name,
                is_selected,
                is_selected,
            ) {
                Ok(option) => {
                    if let Err(e) = select.append_child(&option) {
                        log::warn!("Failed to add option {}: {:?}", name, e);
                    }
                }
                Err(e) => log::warn!("Failed to create option {}: {:?}", name, e),
            }
        }
        refresh_widget(select);
    }

    fn show_modal(&self) {
        // Bootstrap's modal API when present, otherwise just reveal the element.
        if global(&["bootstrap", "Modal"])
            .and_then(|modal| call(&modal, "getOrCreateInstance", &[self.plot_modal.clone().into()]))
            .and_then(|instance| call(&instance, "show", &[]))
            .is_ok()
        {
            return;
        }
        let shown = self
            .plot_modal
            .class_list()
            .add_1("show")
            .and_then(|_| self.plot_modal.set_attribute("style", "display: block"));
        if let Err(e) = shown {
            log::warn!("Failed to show plot modal: {:?}", e);
        }
    }
}

impl ControlSurface for DomControls {
    fn set_dataset(&mut self, dataset: &DatasetOption) {
        // Setting the value raises no change event, so this does not reload.
        self.dataset.set_value(&dataset.to_option_value());
        refresh_widget(&self.dataset);
    }

    fn set_variable_options(&mut self, names: &[String], selected: Option<&str>) {
        self.replace_options(&self.variable, names, selected);
    }

    fn set_style_options(&mut self, names: &[String], selected: Option<&str>) {
        self.replace_options(&self.style, names, selected);
    }

    fn set_legend(&mut self, legend_url: Option<&str>) {
        self.legend.set_inner_html("");
        let Some(url) = legend_url else {
            return;
        };

        let result = (|| -> Result<(), JsValue> {
            let title = self.document.create_element("li")?;
            title.set_class_name("title");
            title.set_text_content(Some("Legend"));
            let image = self.document.create_element("img")?;
            image.set_attribute("src", url)?;
            self.legend.append_child(&title)?;
            self.legend.append_child(&image)?;
            Ok(())
        })();
        if let Err(e) = result {
            log::warn!("Failed to update legend: {:?}", e);
        }
    }

    fn set_loading(&mut self, visible: bool) {
        if let Err(e) = self.loader.class_list().toggle_with_force("show", visible) {
            log::warn!("Failed to toggle loader: {:?}", e);
        }
    }

    fn open_plot_modal(&mut self) {
        self.plot_container.set_inner_html(PLOT_LOADING_HTML);
        self.show_modal();
    }

    fn set_plot_content(&mut self, html: &str) {
        // jQuery's html() runs the scripts the plot markup embeds; innerHTML
        // does not.
        let injected = jquery(&self.plot_container)
            .map(|wrapped| call(&wrapped, "html", &[JsValue::from_str(html)]));
        if !matches!(injected, Some(Ok(_))) {
            self.plot_container.set_inner_html(html);
        }
    }

    fn vertical_level(&self) -> Option<String> {
        self.vertical_level.as_ref().map(|input| input.value())
    }
}

fn element(document: &Document, id: &'static str) -> Result<Element, BindError> {
    document
        .get_element_by_id(id)
        .ok_or(BindError::MissingElement(id))
}

fn typed_element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, BindError> {
    element(document, id)?
        .dyn_into()
        .map_err(|_| BindError::WrongElementType(id))
}

/// Lets a select2 widget wrapping `select` pick up new options.
fn refresh_widget(select: &HtmlSelectElement) {
    if let Some(wrapped) = jquery(select) {
        if let Err(e) = call(&wrapped, "trigger", &[JsValue::from_str("change.select2")]) {
            log::warn!("Failed to refresh select2 widget: {:?}", e);
        }
    }
}
