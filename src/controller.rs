use std::fmt;

use crate::dom::{Dom, NodeId};
use crate::forms::{FieldError, SubmissionRecord};
use crate::page::{AnalyticsEvent, AnalyticsKind, EventState, Page};
use crate::transport::TransportError;
use crate::{Error, Result};

pub(crate) const NAVBAR_SCROLL_THRESHOLD: i64 = 100;
pub(crate) const ACTIVE_PROBE_OFFSET: i64 = 100;
pub(crate) const ANCHOR_HEADER_OFFSET: i64 = 80;
pub(crate) const SUCCESS_VISIBLE_MS: i64 = 5000;
pub(crate) const SUCCESS_FADE_MS: i64 = 300;

pub(crate) const SENDING_LABEL: &str = "Wird gesendet...";
pub(crate) const SUCCESS_MESSAGE: &str = "Vielen Dank! Ihre Nachricht wurde erfolgreich gesendet. Wir melden uns schnellstmöglich bei Ihnen.";
pub(crate) const FAILURE_MESSAGE: &str = "Es gab einen Fehler beim Senden Ihrer Nachricht. Bitte versuchen Sie es erneut oder rufen Sie uns direkt an.";

pub(crate) const CRITICAL_IMAGE_URLS: [&str; 3] = [
    "https://images.pexels.com/photos/1118448/pexels-photo-1118448.jpeg?auto=compress&cs=tinysrgb&w=1920",
    "https://images.pexels.com/photos/116675/pexels-photo-116675.jpeg?auto=compress&cs=tinysrgb&w=600",
    "https://images.pexels.com/photos/170811/pexels-photo-170811.jpeg?auto=compress&cs=tinysrgb&w=600",
];

#[derive(Debug, Clone)]
pub(crate) struct Hooks {
    pub(crate) hamburger: NodeId,
    pub(crate) nav_menu: NodeId,
    pub(crate) navbar: NodeId,
    pub(crate) contact_form: NodeId,
    pub(crate) submit_button: NodeId,
    pub(crate) nav_links: Vec<NodeId>,
    pub(crate) phone_input: Option<NodeId>,
}

impl Hooks {
    pub(crate) fn resolve(dom: &Dom) -> Result<Self> {
        let hamburger = dom
            .by_id("hamburger")
            .ok_or_else(|| Error::MissingHook("#hamburger".into()))?;
        let nav_menu = dom
            .by_id("nav-menu")
            .ok_or_else(|| Error::MissingHook("#nav-menu".into()))?;
        let navbar = dom
            .by_id("navbar")
            .ok_or_else(|| Error::MissingHook("#navbar".into()))?;
        let contact_form = dom
            .by_id("contactForm")
            .ok_or_else(|| Error::MissingHook("#contactForm".into()))?;
        let submit_button = dom
            .query_selector_from(contact_form, r#"button[type="submit"]"#)?
            .ok_or_else(|| Error::MissingHook("contact form submit button".into()))?;
        let nav_links = dom.query_selector_all(".nav-link")?;
        let phone_input = dom.by_id("phone");
        Ok(Self {
            hamburger,
            nav_menu,
            navbar,
            contact_form,
            submit_button,
            nav_links,
            phone_input,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Behavior {
    ToggleMenu,
    CloseMenuOnNavigate,
    UpdateNavbarOnScroll,
    HighlightActiveSection,
    SmoothScrollAnchor,
    HandleContactSubmit,
    FormatPhoneInput,
    UpdateFloatingLabel,
    TrackTelClick,
    TrackSocialClick,
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Behavior::ToggleMenu => "toggle-menu",
            Behavior::CloseMenuOnNavigate => "close-menu-on-navigate",
            Behavior::UpdateNavbarOnScroll => "update-navbar-on-scroll",
            Behavior::HighlightActiveSection => "highlight-active-section",
            Behavior::SmoothScrollAnchor => "smooth-scroll-anchor",
            Behavior::HandleContactSubmit => "handle-contact-submit",
            Behavior::FormatPhoneInput => "format-phone-input",
            Behavior::UpdateFloatingLabel => "update-floating-label",
            Behavior::TrackTelClick => "track-tel-click",
            Behavior::TrackSocialClick => "track-social-click",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Task {
    CompleteSubmission {
        button: NodeId,
        original_label: String,
        outcome: std::result::Result<(), TransportError>,
    },
    FadeSuccessBanner {
        banner: NodeId,
    },
    RemoveSuccessBanner {
        banner: NodeId,
    },
}

impl Page {
    pub(crate) fn mount(&mut self) -> Result<()> {
        self.listeners
            .add(self.hooks.hamburger, "click", Behavior::ToggleMenu);
        for link in self.hooks.nav_links.clone() {
            self.listeners.add(link, "click", Behavior::CloseMenuOnNavigate);
        }

        self.listeners
            .add(self.dom.root, "scroll", Behavior::UpdateNavbarOnScroll);
        self.listeners
            .add(self.dom.root, "scroll", Behavior::HighlightActiveSection);

        for anchor in self.dom.query_selector_all(r##"a[href^="#"]"##)? {
            self.listeners.add(anchor, "click", Behavior::SmoothScrollAnchor);
        }

        self.listeners
            .add(self.hooks.contact_form, "submit", Behavior::HandleContactSubmit);

        if let Some(phone) = self.hooks.phone_input {
            self.listeners.add(phone, "input", Behavior::FormatPhoneInput);
        }

        for control in self
            .dom
            .query_selector_all(".form-group input, .form-group textarea")?
        {
            self.listeners.add(control, "blur", Behavior::UpdateFloatingLabel);
        }

        for url in CRITICAL_IMAGE_URLS {
            self.preload_urls.push(url.to_string());
            self.trace_line(format!("[preload] image url={url}"));
        }

        for link in self.dom.query_selector_all(r#"a[href^="tel:"]"#)? {
            self.listeners.add(link, "click", Behavior::TrackTelClick);
        }
        for icon in self.dom.query_selector_all(".social-icon")? {
            self.listeners.add(icon, "click", Behavior::TrackSocialClick);
        }

        self.mount_reveal_targets()?;
        self.run_reveal_pass()?;
        Ok(())
    }

    fn mount_reveal_targets(&mut self) -> Result<()> {
        self.mount_reveal_group(".service-card", "fade-in", 100)?;
        self.mount_reveal_group(".fleet-card", "fade-in", 200)?;
        self.mount_reveal_group(".feature-item", "fade-in", 100)?;
        self.mount_reveal_group(".contact-item", "slide-in-left", 100)?;

        if let Some(container) = self.dom.query_selector(".contact-form-container")? {
            self.dom.class_add(container, "slide-in-right")?;
            self.reveal.observe(container);
        }
        Ok(())
    }

    fn mount_reveal_group(&mut self, selector: &str, class_name: &str, step_ms: i64) -> Result<()> {
        for (index, node) in self
            .dom
            .query_selector_all(selector)?
            .into_iter()
            .enumerate()
        {
            self.dom.class_add(node, class_name)?;
            let delay_ms = index as i64 * step_ms;
            self.dom
                .style_set(node, "transitionDelay", &transition_delay_value(delay_ms))?;
            self.reveal.observe(node);
        }
        Ok(())
    }

    pub(crate) fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        match behavior {
            Behavior::ToggleMenu => self.toggle_menu(),
            Behavior::CloseMenuOnNavigate => self.close_menu(),
            Behavior::UpdateNavbarOnScroll => self.update_navbar_state(),
            Behavior::HighlightActiveSection => self.highlight_active_section(),
            Behavior::SmoothScrollAnchor => self.follow_anchor(event),
            Behavior::HandleContactSubmit => self.handle_contact_submit(event),
            Behavior::FormatPhoneInput => self.format_phone_field(event),
            Behavior::UpdateFloatingLabel => self.update_floating_label(event),
            Behavior::TrackTelClick => self.track_click(event, AnalyticsKind::TelClick),
            Behavior::TrackSocialClick => self.track_click(event, AnalyticsKind::SocialClick),
        }
    }

    pub(crate) fn run_task(&mut self, task: Task) -> Result<()> {
        match task {
            Task::CompleteSubmission {
                button,
                original_label,
                outcome,
            } => {
                match outcome {
                    Ok(()) => {
                        self.show_success_banner()?;
                        self.dom.reset_form_controls(self.hooks.contact_form)?;
                        self.trace_line("[submit] delivered".into());
                    }
                    Err(reason) => {
                        self.show_form_level_error()?;
                        self.trace_line(format!("[submit] failed reason={reason}"));
                    }
                }
                // Button restore runs on both outcomes.
                self.dom.class_remove(button, "loading")?;
                self.dom.set_text_content(button, &original_label)?;
                self.dom.set_disabled(button, false)?;
                Ok(())
            }
            Task::FadeSuccessBanner { banner } => {
                if !self.dom.is_connected(banner) {
                    return Ok(());
                }
                self.dom.class_remove(banner, "show")?;
                self.schedule_task(SUCCESS_FADE_MS, Task::RemoveSuccessBanner { banner });
                Ok(())
            }
            Task::RemoveSuccessBanner { banner } => {
                if !self.dom.is_connected(banner) {
                    return Ok(());
                }
                self.dom.remove_node(banner)
            }
        }
    }

    fn toggle_menu(&mut self) -> Result<()> {
        self.dom.class_toggle(self.hooks.hamburger, "active")?;
        self.dom.class_toggle(self.hooks.nav_menu, "active")?;
        Ok(())
    }

    fn close_menu(&mut self) -> Result<()> {
        self.dom.class_remove(self.hooks.hamburger, "active")?;
        self.dom.class_remove(self.hooks.nav_menu, "active")?;
        Ok(())
    }

    fn update_navbar_state(&mut self) -> Result<()> {
        if self.scroll_y > NAVBAR_SCROLL_THRESHOLD {
            self.dom.class_add(self.hooks.navbar, "scrolled")?;
        } else {
            self.dom.class_remove(self.hooks.navbar, "scrolled")?;
        }
        Ok(())
    }

    fn highlight_active_section(&mut self) -> Result<()> {
        let probe = self.scroll_y + ACTIVE_PROBE_OFFSET;
        let mut active_id: Option<String> = None;
        for section in self.dom.query_selector_all("section[id]")? {
            let top = self.dom.offset_top(section)?;
            let height = self.dom.offset_height(section)?;
            // Half-open band so adjoining sections never both claim the probe line.
            if probe >= top && probe < top + height {
                if let Some(id) = self.dom.attr(section, "id") {
                    active_id = Some(id);
                }
            }
        }

        let Some(active_id) = active_id else {
            return Ok(());
        };

        for link in self.hooks.nav_links.clone() {
            self.dom.class_remove(link, "active")?;
        }
        let target_href = format!("#{active_id}");
        for link in self.hooks.nav_links.clone() {
            if self.dom.attr(link, "href").as_deref() == Some(target_href.as_str()) {
                self.dom.class_add(link, "active")?;
            }
        }
        Ok(())
    }

    fn follow_anchor(&mut self, event: &mut EventState) -> Result<()> {
        event.prevent_default();

        let Some(href) = self.dom.attr(event.current_target, "href") else {
            return Ok(());
        };
        if href == "#" {
            return Ok(());
        }
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(());
        };
        let Some(target) = self.dom.by_id(fragment) else {
            return Ok(());
        };

        let top = self.dom.offset_top(target)? - ANCHOR_HEADER_OFFSET;
        self.scroll_viewport_to(top)
    }

    fn handle_contact_submit(&mut self, event: &mut EventState) -> Result<()> {
        event.prevent_default();

        for group in self.dom.query_selector_all(".form-group")? {
            self.dom.class_remove(group, "error")?;
        }
        self.remove_form_level_error()?;

        let entries = self.dom.form_data_entries(self.hooks.contact_form)?;
        let record = SubmissionRecord::from_entries(&entries);
        let errors = self.validator.check(&record)?;
        if !errors.is_empty() {
            for error in &errors {
                self.show_field_error(error)?;
            }
            self.trace_line(format!("[submit] rejected errors={}", errors.len()));
            return Ok(());
        }

        let button = self.hooks.submit_button;
        let original_label = self.dom.text_content(button);
        self.dom.class_add(button, "loading")?;
        self.dom.set_text_content(button, SENDING_LABEL)?;
        self.dom.set_disabled(button, true)?;

        let delivery = self.transport.submit(&record);
        self.trace_line(format!("[submit] dispatched delay_ms={}", delivery.delay_ms));
        self.schedule_task(
            delivery.delay_ms,
            Task::CompleteSubmission {
                button,
                original_label,
                outcome: delivery.outcome,
            },
        );
        Ok(())
    }

    fn show_field_error(&mut self, error: &FieldError) -> Result<()> {
        let Some(field) = self.dom.by_id(error.field.id()) else {
            return Ok(());
        };
        let Some(group) = self.dom.closest(field, ".form-group")? else {
            return Ok(());
        };

        self.dom.class_add(group, "error")?;
        if let Some(existing) = self.dom.query_selector_from(group, ".error-message")? {
            self.dom.remove_node(existing)?;
        }

        let message_node = self.dom.create_detached_element("div");
        self.dom.set_attr(message_node, "class", "error-message")?;
        self.dom.set_text_content(message_node, error.message)?;
        self.dom.append_child(group, message_node)?;
        Ok(())
    }

    fn show_form_level_error(&mut self) -> Result<()> {
        self.remove_form_level_error()?;

        let banner = self.dom.create_detached_element("div");
        self.dom.set_attr(banner, "class", "error-message")?;
        self.dom.set_text_content(banner, FAILURE_MESSAGE)?;
        self.dom.prepend_child(self.hooks.contact_form, banner)?;
        Ok(())
    }

    // Field markers live inside a .form-group; the form-level banner is the
    // only .error-message that sits directly under the form element.
    fn remove_form_level_error(&mut self) -> Result<()> {
        let form = self.hooks.contact_form;
        let stale: Vec<NodeId> = self
            .dom
            .query_selector_all_from(form, ".error-message")?
            .into_iter()
            .filter(|node| self.dom.parent(*node) == Some(form))
            .collect();
        for node in stale {
            self.dom.remove_node(node)?;
        }
        Ok(())
    }

    fn show_success_banner(&mut self) -> Result<()> {
        if let Some(existing) = self.dom.query_selector(".success-message")? {
            self.dom.remove_node(existing)?;
        }

        let banner = self.dom.create_detached_element("div");
        self.dom.set_attr(banner, "class", "success-message show")?;
        self.dom.set_text_content(banner, SUCCESS_MESSAGE)?;
        self.dom.prepend_child(self.hooks.contact_form, banner)?;
        self.schedule_task(SUCCESS_VISIBLE_MS, Task::FadeSuccessBanner { banner });
        Ok(())
    }

    fn format_phone_field(&mut self, event: &mut EventState) -> Result<()> {
        let raw = self.dom.value(event.target)?;
        let formatted = self.phone.format(&raw)?;
        self.dom.set_value(event.target, &formatted)
    }

    fn update_floating_label(&mut self, event: &mut EventState) -> Result<()> {
        let node = event.current_target;
        if self.dom.value(node)?.trim().is_empty() {
            self.dom.class_remove(node, "has-value")
        } else {
            self.dom.class_add(node, "has-value")
        }
    }

    fn track_click(&mut self, event: &mut EventState, kind: AnalyticsKind) -> Result<()> {
        let node = event.current_target;
        let href = self.dom.attr(node, "href").unwrap_or_default();
        let label = match kind {
            AnalyticsKind::TelClick => "tel",
            AnalyticsKind::SocialClick => "social",
        };
        self.trace_line(format!("[analytics] {label} href={href}"));
        self.analytics.push(AnalyticsEvent { kind, href });
        Ok(())
    }
}

fn transition_delay_value(delay_ms: i64) -> String {
    let seconds = delay_ms / 1000;
    let millis = delay_ms % 1000;
    if millis == 0 {
        return format!("{seconds}s");
    }
    let fraction = format!("{millis:03}");
    let fraction = fraction.trim_end_matches('0');
    format!("{seconds}.{fraction}s")
}
