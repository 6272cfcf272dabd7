//! Compiled stylesheets bound to an engine.

use super::ClassBindings;
use crate::compile::{compile, CompileError, Compiled};
use crate::description::Description;
use crate::engine::{EngineError, Props, Sheet, SheetOptions, StyleEngine};

/// Options for [`Styled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Create a linked sheet per instance so dynamic values follow its props.
    /// When `false`, all instances share one static sheet.
    pub dynamic_values: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            dynamic_values: true,
        }
    }
}

/// A compiled stylesheet bound to a [`StyleEngine`].
///
/// # Example
///
/// ```rust
/// use stylemap::{BindOptions, CssEngine, Description, Styled};
///
/// let description = Description::from_yaml_str(r#"
/// badge:
///   color: white
///   "@variants":
///     alert:
///       background: red
/// "#).unwrap();
///
/// let styled = Styled::new(CssEngine::new(), &description, BindOptions::default()).unwrap();
/// let instance = styled.instance(&serde_json::json!({})).unwrap();
/// assert_eq!(
///     instance.classes().variant("badge", "alert"),
///     Some("badge-1-1 badge-alert-1-2"),
/// );
/// ```
pub struct Styled<E: StyleEngine> {
    engine: E,
    compiled: Compiled,
    options: BindOptions,
    shared: Option<(E::Sheet, ClassBindings)>,
}

impl<E: StyleEngine> Styled<E> {
    /// Compiles `description` and prepares it for `engine`.
    ///
    /// With static values the shared sheet is created and attached here.
    pub fn new(
        engine: E,
        description: &Description,
        options: BindOptions,
    ) -> Result<Self, CompileError> {
        Ok(Self::from_compiled(engine, compile(description)?, options))
    }

    /// Prepares an already compiled stylesheet for `engine`.
    pub fn from_compiled(engine: E, compiled: Compiled, options: BindOptions) -> Self {
        let shared = if options.dynamic_values {
            None
        } else {
            let mut sheet = engine.create_sheet(compiled.rules(), SheetOptions::unlinked());
            sheet.attach();
            let bindings = ClassBindings::bind(&sheet, &compiled);
            Some((sheet, bindings))
        };
        Self {
            engine,
            compiled,
            options,
            shared,
        }
    }

    /// The compiled stylesheet.
    pub fn compiled(&self) -> &Compiled {
        &self.compiled
    }

    /// The options this was created with.
    pub fn options(&self) -> BindOptions {
        self.options
    }

    /// Class bindings of the shared sheet, when values are static.
    pub fn static_classes(&self) -> Option<&ClassBindings> {
        self.shared.as_ref().map(|(_, bindings)| bindings)
    }

    /// Creates an instance styled with `props`.
    ///
    /// With dynamic values this creates, attaches and updates a new linked
    /// sheet. Otherwise the instance uses the shared sheet and `props` is
    /// ignored.
    pub fn instance(&self, props: &Props) -> Result<StyledInstance<'_, E::Sheet>, EngineError> {
        if let Some((sheet, bindings)) = &self.shared {
            return Ok(StyledInstance {
                sheet: InstanceSheet::Shared(sheet),
                classes: bindings.clone(),
            });
        }

        let mut sheet = self
            .engine
            .create_sheet(self.compiled.rules(), SheetOptions::linked());
        sheet.attach();
        sheet.update(props)?;
        let classes = ClassBindings::bind(&sheet, &self.compiled);
        Ok(StyledInstance {
            sheet: InstanceSheet::Linked(sheet),
            classes,
        })
    }
}

enum InstanceSheet<'a, S> {
    Shared(&'a S),
    Linked(S),
}

/// One styled instance: its class bindings and the sheet behind them.
pub struct StyledInstance<'a, S: Sheet> {
    sheet: InstanceSheet<'a, S>,
    classes: ClassBindings,
}

impl<S: Sheet> StyledInstance<'_, S> {
    /// Generated class names for the instance.
    pub fn classes(&self) -> &ClassBindings {
        &self.classes
    }

    /// The sheet the classes belong to.
    pub fn sheet(&self) -> &S {
        match &self.sheet {
            InstanceSheet::Shared(sheet) => sheet,
            InstanceSheet::Linked(sheet) => sheet,
        }
    }

    /// Whether the instance owns a linked sheet.
    pub fn is_linked(&self) -> bool {
        matches!(self.sheet, InstanceSheet::Linked(_))
    }

    /// Pushes new props into the instance's sheet. No-op on a shared sheet.
    pub fn update(&mut self, props: &Props) -> Result<(), EngineError> {
        match &mut self.sheet {
            InstanceSheet::Shared(_) => Ok(()),
            InstanceSheet::Linked(sheet) => sheet.update(props),
        }
    }
}

impl<S: Sheet> Drop for StyledInstance<'_, S> {
    fn drop(&mut self) {
        if let InstanceSheet::Linked(sheet) = &mut self.sheet {
            sheet.detach();
        }
    }
}
