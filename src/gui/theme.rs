use eframe::egui::{
    self,
    epaint::Shadow,
    style::{
        Selection,
        WidgetVisuals,
        Widgets,
    },
    Color32,
    RichText,
    Stroke,
    Visuals,
};

/// Colours for the dark and light variants of the study UI.
#[derive(Clone)]
pub struct Theme {
    dark: Palette,
    light: Palette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::ink()
    }
}

impl Theme {
    pub fn ink() -> Self {
        Theme { dark: Palette::ink_dark(), light: Palette::paper() }
    }

    fn palette(&self, ctx: &egui::Context) -> &Palette {
        if ctx.style().visuals.dark_mode {
            &self.dark
        } else {
            &self.light
        }
    }

    /// Large radical or character glyph.
    pub fn glyph(&self, ctx: &egui::Context, content: &str, size: f32) -> RichText {
        RichText::new(content).size(size).color(self.palette(ctx).foreground)
    }

    pub fn heading(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).strong().color(self.palette(ctx).accent)
    }

    pub fn muted(&self, ctx: &egui::Context, content: &str) -> RichText {
        RichText::new(content).color(self.palette(ctx).comment)
    }

    pub fn seal(&self, ctx: &egui::Context) -> Color32 {
        self.palette(ctx).seal
    }

    pub fn jade(&self, ctx: &egui::Context) -> Color32 {
        self.palette(ctx).jade
    }

    pub fn gold(&self, ctx: &egui::Context) -> Color32 {
        self.palette(ctx).gold
    }
}

#[derive(Clone)]
struct Palette {
    background: Color32,
    background_dark: Color32,
    background_light: Color32,
    foreground: Color32,
    selection: Color32,
    comment: Color32,
    accent: Color32,
    seal: Color32,
    jade: Color32,
    gold: Color32,
}

impl Palette {
    fn ink_dark() -> Self {
        Self {
            background: Color32::from_rgb(0x1f, 0x1d, 0x1b),
            background_dark: Color32::from_rgb(0x17, 0x16, 0x14),
            background_light: Color32::from_rgb(0x2c, 0x29, 0x26),
            foreground: Color32::from_rgb(0xee, 0xe8, 0xdc),
            selection: Color32::from_rgb(0x45, 0x3f, 0x38),
            comment: Color32::from_rgb(0x9a, 0x91, 0x84),
            accent: Color32::from_rgb(0xd9, 0xa4, 0x41),
            seal: Color32::from_rgb(0xd0, 0x4a, 0x3c),
            jade: Color32::from_rgb(0x6f, 0xb5, 0x8e),
            gold: Color32::from_rgb(0xe6, 0xc0, 0x5c),
        }
    }

    fn paper() -> Self {
        Self {
            background: Color32::from_rgb(0xf7, 0xf2, 0xe7),
            background_dark: Color32::from_rgb(0xec, 0xe4, 0xd3),
            background_light: Color32::from_rgb(0xfd, 0xfa, 0xf3),
            foreground: Color32::from_rgb(0x2a, 0x25, 0x20),
            selection: Color32::from_rgb(0xe2, 0xd3, 0xb4),
            comment: Color32::from_rgb(0x7d, 0x72, 0x64),
            accent: Color32::from_rgb(0x9c, 0x5b, 0x12),
            seal: Color32::from_rgb(0xb0, 0x2e, 0x22),
            jade: Color32::from_rgb(0x2f, 0x7d, 0x57),
            gold: Color32::from_rgb(0xa8, 0x7a, 0x10),
        }
    }
}

pub fn set_theme(ctx: &egui::Context, theme: &Theme) {
    set_theme_variant(ctx, &theme.dark, true);
    set_theme_variant(ctx, &theme.light, false);

    ctx.all_styles_mut(|style| {
        style.interaction.tooltip_delay = 0.0;
        style.interaction.show_tooltips_only_when_still = false;
    });
}

fn set_theme_variant(ctx: &egui::Context, palette: &Palette, is_dark: bool) {
    let (default, variant) = match is_dark {
        true => (Visuals::dark(), egui::Theme::Dark),
        false => (Visuals::light(), egui::Theme::Light),
    };

    let widget = |base: WidgetVisuals, fill: Color32, outline: Color32| WidgetVisuals {
        bg_fill: fill,
        weak_bg_fill: fill,
        bg_stroke: Stroke { color: outline, ..base.bg_stroke },
        fg_stroke: Stroke { color: palette.foreground, ..base.fg_stroke },
        ..base
    };

    ctx.set_visuals_of(
        variant,
        Visuals {
            dark_mode: is_dark,
            widgets: Widgets {
                noninteractive: widget(
                    default.widgets.noninteractive,
                    palette.background,
                    palette.background_dark,
                ),
                inactive: widget(
                    default.widgets.inactive,
                    palette.background_light,
                    palette.background_dark,
                ),
                hovered: widget(default.widgets.hovered, palette.selection, palette.accent),
                active: widget(default.widgets.active, palette.selection, palette.accent),
                open: widget(default.widgets.open, palette.background_dark, palette.accent),
            },
            selection: Selection {
                bg_fill: palette.selection,
                stroke: Stroke { color: palette.foreground, ..default.selection.stroke },
            },
            hyperlink_color: palette.accent,
            faint_bg_color: palette.background_light,
            extreme_bg_color: palette.background_dark,
            code_bg_color: palette.background_dark,
            error_fg_color: palette.seal,
            warn_fg_color: palette.gold,
            window_shadow: Shadow { color: palette.background_dark, ..default.window_shadow },
            window_fill: palette.background,
            window_stroke: Stroke { color: palette.background_light, ..default.window_stroke },
            panel_fill: palette.background,
            collapsing_header_frame: true,
            ..default
        },
    );
}
